/// Per-tick survival decay and the environmental damage that kicks in when
/// a stat bottoms out.
#[derive(Debug, Clone, Copy)]
pub struct SurvivalTuning {
    pub hunger_decay_per_tick: f32,
    pub warmth_decay_per_tick: f32,
    pub energy_decay_per_tick: f32,
    /// Warmth regenerates inside this radius of a barrel fire.
    pub fire_warmth_radius: f32,
    pub fire_warmth_per_tick: f32,
    /// Standing essentially inside the barrel burns.
    pub fire_burn_radius: f32,
    pub fire_burn_damage_per_tick: f32,
    pub starvation_damage: f32,
    pub starvation_interval_ticks: u32,
    pub freezing_damage: f32,
    pub freezing_interval_ticks: u32,
    /// Energy regained per tick while standing still.
    pub energy_rest_per_tick: f32,
}

impl Default for SurvivalTuning {
    fn default() -> Self {
        Self {
            // Roughly six minutes from full to starving at 30 Hz.
            hunger_decay_per_tick: 100.0 / (360.0 * 30.0),
            warmth_decay_per_tick: 100.0 / (240.0 * 30.0),
            energy_decay_per_tick: 100.0 / (480.0 * 30.0),
            fire_warmth_radius: 3.5,
            fire_warmth_per_tick: 0.15,
            fire_burn_radius: 0.8,
            fire_burn_damage_per_tick: 0.5,
            starvation_damage: 2.0,
            starvation_interval_ticks: 60,
            freezing_damage: 2.0,
            freezing_interval_ticks: 60,
            energy_rest_per_tick: 0.02,
        }
    }
}
