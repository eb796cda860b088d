use crate::tree::LayoutTree;
use crate::TreeError;
use flexlay_types::NodeId;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Severity passed to a [`Logger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Verbose,
    Fatal,
}

impl LogLevel {
    /// The facade level used when no logger hook is installed.
    pub fn as_log_level(self) -> log::Level {
        match self {
            LogLevel::Fatal | LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Verbose => log::Level::Trace,
        }
    }
}

/// Opt-in behaviours that are not on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExperimentalFeature {
    /// Recompute a child's flex basis at most once per layout pass, the way
    /// browsers do, instead of reusing it across passes.
    WebFlexBasis,
}

/// Receives every message the engine emits for nodes under this config.
pub type Logger = Arc<dyn Fn(Option<NodeId>, LogLevel, &str) + Send + Sync>;

/// Materializes a shared child during copy-on-write:
/// `(tree, old_child, owner, index) -> new_child`.
///
/// The returned node must not have an owner; the engine adopts it.
pub type CloneNodeFunc = Arc<dyn Fn(&mut LayoutTree, NodeId, NodeId, usize) -> NodeId + Send + Sync>;

/// Settings shared by every node that references this config.
///
/// Changing a config never dirties nodes; it only affects later passes.
#[derive(Clone)]
pub struct Config {
    /// Pixel density used for the final rounding pass. `0` disables rounding.
    ///
    /// Defaults to `1.0`.
    point_scale_factor: f32,
    /// Keeps the older behaviour where a container measured without an
    /// exact main size stretches to the available space even when nothing
    /// in it can grow.
    pub use_legacy_stretch_behaviour: bool,
    /// Re-runs any pass that relied on the legacy flag with the flag off and
    /// records on the root whether the outcome differed.
    pub should_diff_layout_without_legacy_stretch_behaviour: bool,
    /// Nodes created under this config get browser defaults: row direction,
    /// stretched lines and a flex-shrink of 1.
    pub use_web_defaults: bool,
    /// Logs the laid-out tree at debug level after every pass.
    pub print_tree: bool,
    experimental_features: HashSet<ExperimentalFeature>,
    logger: Option<Logger>,
    clone_node_func: Option<CloneNodeFunc>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            point_scale_factor: 1.0,
            use_legacy_stretch_behaviour: false,
            should_diff_layout_without_legacy_stretch_behaviour: false,
            use_web_defaults: false,
            print_tree: false,
            experimental_features: HashSet::new(),
            logger: None,
            clone_node_func: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("point_scale_factor", &self.point_scale_factor)
            .field("use_legacy_stretch_behaviour", &self.use_legacy_stretch_behaviour)
            .field(
                "should_diff_layout_without_legacy_stretch_behaviour",
                &self.should_diff_layout_without_legacy_stretch_behaviour,
            )
            .field("use_web_defaults", &self.use_web_defaults)
            .field("print_tree", &self.print_tree)
            .field("experimental_features", &self.experimental_features)
            .field("logger", &self.logger.is_some())
            .field("clone_node_func", &self.clone_node_func.is_some())
            .finish()
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn point_scale_factor(&self) -> f32 {
        self.point_scale_factor
    }

    /// Sets the rounding density. Negative and NaN factors are rejected.
    pub fn set_point_scale_factor(&mut self, factor: f32) -> Result<(), TreeError> {
        if factor.is_nan() || factor < 0.0 {
            return Err(TreeError::InvalidScaleFactor(factor));
        }
        self.point_scale_factor = factor;
        Ok(())
    }

    pub fn is_experimental_feature_enabled(&self, feature: ExperimentalFeature) -> bool {
        self.experimental_features.contains(&feature)
    }

    pub fn set_experimental_feature_enabled(&mut self, feature: ExperimentalFeature, enabled: bool) {
        if enabled {
            self.experimental_features.insert(feature);
        } else {
            self.experimental_features.remove(&feature);
        }
    }

    pub fn logger(&self) -> Option<&Logger> {
        self.logger.as_ref()
    }

    /// Installs or clears the logger hook. Without one, messages go to the
    /// `log` facade.
    pub fn set_logger(&mut self, logger: Option<Logger>) {
        self.logger = logger;
    }

    pub fn clone_node_func(&self) -> Option<&CloneNodeFunc> {
        self.clone_node_func.as_ref()
    }

    pub fn set_clone_node_func(&mut self, func: Option<CloneNodeFunc>) {
        self.clone_node_func = func;
    }

    /// Routes a message through the hook, or through `log` when unset.
    pub fn log(&self, node: Option<NodeId>, level: LogLevel, message: &str) {
        match &self.logger {
            Some(logger) => logger(node, level, message),
            None => match node {
                Some(node) => log::log!(level.as_log_level(), "[{}] {}", node, message),
                None => log::log!(level.as_log_level(), "{}", message),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.point_scale_factor(), 1.0);
        assert!(!config.use_legacy_stretch_behaviour);
        assert!(!config.use_web_defaults);
        assert!(!config.is_experimental_feature_enabled(ExperimentalFeature::WebFlexBasis));
        assert!(config.logger().is_none());
    }

    #[test]
    fn test_scale_factor_validation() {
        let mut config = Config::default();
        assert!(config.set_point_scale_factor(0.0).is_ok());
        assert_eq!(config.point_scale_factor(), 0.0);
        assert!(config.set_point_scale_factor(3.0).is_ok());
        assert!(matches!(
            config.set_point_scale_factor(-1.0),
            Err(TreeError::InvalidScaleFactor(_))
        ));
        assert_eq!(config.point_scale_factor(), 3.0);
    }

    #[test]
    fn test_experimental_toggle() {
        let mut config = Config::default();
        config.set_experimental_feature_enabled(ExperimentalFeature::WebFlexBasis, true);
        assert!(config.is_experimental_feature_enabled(ExperimentalFeature::WebFlexBasis));
        config.set_experimental_feature_enabled(ExperimentalFeature::WebFlexBasis, false);
        assert!(!config.is_experimental_feature_enabled(ExperimentalFeature::WebFlexBasis));
    }

    #[test]
    fn test_logger_hook_receives_messages() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut config = Config::default();
        config.set_logger(Some(Arc::new(move |node: Option<NodeId>, level: LogLevel, message: &str| {
            sink.lock().unwrap().push((node, level, message.to_string()));
        })));

        config.log(Some(NodeId::new(3)), LogLevel::Warn, "hello");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], (Some(NodeId::new(3)), LogLevel::Warn, "hello".to_string()));
    }
}
