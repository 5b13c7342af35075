// Interface adapters layer: wire-facing DTOs for the transport layer.

pub mod protocol;
