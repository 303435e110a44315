//! Configuration for connector routing

/// Tunable distances used by the routing engine.
///
/// The defaults are empirical: they are the pixel tolerances the editor has
/// always shipped with, kept as named knobs rather than re-derived.
#[derive(Debug, Clone, Copy)]
pub struct RoutingConfig {
    /// How close (per axis, in px) an anchor target must be to the last
    /// waypoint for `finish` to reuse it instead of bridging a new segment
    pub finish_tolerance: f64,

    /// Clearance (px) kept between a detour and the shape it routes around;
    /// also the probe distance used to decide that a break is needed
    pub break_clearance: f64,

    /// Picking radius (px) around a connector's free endpoint
    pub endpoint_radius: f64,

    /// Coordinate-equality tolerance when classifying an anchor edge as
    /// horizontal or vertical at bind time
    pub axis_tolerance: f64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            finish_tolerance: 10.0,
            break_clearance: 20.0,
            endpoint_radius: 5.0,
            axis_tolerance: 0.0,
        }
    }
}

impl RoutingConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the finish tolerance
    pub fn with_finish_tolerance(mut self, tolerance: f64) -> Self {
        self.finish_tolerance = tolerance;
        self
    }

    /// Set the break clearance
    pub fn with_break_clearance(mut self, clearance: f64) -> Self {
        self.break_clearance = clearance;
        self
    }

    /// Set the endpoint picking radius
    pub fn with_endpoint_radius(mut self, radius: f64) -> Self {
        self.endpoint_radius = radius;
        self
    }

    /// Set the axis classification tolerance
    pub fn with_axis_tolerance(mut self, tolerance: f64) -> Self {
        self.axis_tolerance = tolerance;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RoutingConfig::default();
        assert_eq!(config.finish_tolerance, 10.0);
        assert_eq!(config.break_clearance, 20.0);
        assert_eq!(config.endpoint_radius, 5.0);
        assert_eq!(config.axis_tolerance, 0.0);
    }

    #[test]
    fn test_builder_pattern() {
        let config = RoutingConfig::new()
            .with_break_clearance(32.0)
            .with_endpoint_radius(8.0);
        assert_eq!(config.break_clearance, 32.0);
        assert_eq!(config.endpoint_radius, 8.0);
        assert_eq!(config.finish_tolerance, 10.0);
    }
}
