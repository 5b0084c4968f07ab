//! Run orchestration
//!
//! Drives every source through validate, load and render, then hands the
//! message to every enabled alerter. The first hard error aborts the run; a
//! message without attachments is skipped.

use crate::alerters::Alerter;
use crate::config::Config;
use crate::domain::{Message, MessageOptions};
use crate::error::{AppError, Result};
use crate::sources::Source;

/// Why a stage was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Component switched off in config
    Disabled(String),
    /// Source rendered a message without attachments
    Empty(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Disabled(name) => write!(f, "{} is disabled", name),
            SkipReason::Empty(name) => {
                write!(f, "0 attachments found for {}, no need to alert", name)
            }
        }
    }
}

/// Outcome of one pipeline stage
#[derive(Debug)]
pub enum Stage<T> {
    /// Carry on with the value
    Proceed(T),
    /// Nothing to do here, move on
    Skip(SkipReason),
    /// Stop the whole run
    Abort(AppError),
}

/// One successful delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub source: String,
    pub alerter: String,
    pub channel: String,
}

/// What a completed run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Sources switched off in config
    pub disabled: Vec<String>,
    /// Sources skipped because they had nothing to report
    pub skipped: Vec<String>,
    pub deliveries: Vec<Delivery>,
}

/// Validate, load and render one source
pub fn prepare(
    source: &mut dyn Source,
    config: &Config,
    options: &MessageOptions,
) -> Stage<Message> {
    let integrations = &config.integrations;
    let integration = source.name().to_string();

    if !source.enabled(integrations) {
        return Stage::Skip(SkipReason::Disabled(integration));
    }

    if let Err(source_err) = source.validate(integrations) {
        return Stage::Abort(AppError::Validate {
            integration,
            source: source_err,
        });
    }

    if let Err(e) = source.load(integrations) {
        return Stage::Abort(AppError::Load {
            integration,
            source: e,
        });
    }

    let message = match source.generate_message(options) {
        Ok(m) => m,
        Err(e) => {
            return Stage::Abort(AppError::Render {
                integration,
                source: e,
            })
        }
    };

    if message.is_empty() {
        return Stage::Skip(SkipReason::Empty(integration));
    }

    Stage::Proceed(message)
}

/// Load one alerter and deliver the message through it
pub fn deliver(
    alerter: &mut dyn Alerter,
    integration: &str,
    message: &Message,
    config: &Config,
) -> Stage<Delivery> {
    if !alerter.enabled(&config.alert) {
        return Stage::Skip(SkipReason::Disabled(alerter.name().to_string()));
    }

    if let Err(e) = alerter.load(&config.alert) {
        return Stage::Abort(AppError::AlerterLoad {
            alerter: alerter.name().to_string(),
            integration: integration.to_string(),
            source: e,
        });
    }

    if let Err(e) = alerter.alert(message) {
        return Stage::Abort(AppError::Alert {
            alerter: alerter.name().to_string(),
            integration: integration.to_string(),
            source: e,
        });
    }

    Stage::Proceed(Delivery {
        source: integration.to_string(),
        alerter: alerter.name().to_string(),
        channel: alerter.channel().to_string(),
    })
}

/// Fixed, ordered set of sources and alerters
pub struct Runner {
    sources: Vec<Box<dyn Source>>,
    alerters: Vec<Box<dyn Alerter>>,
    options: MessageOptions,
}

impl Runner {
    pub fn new(sources: Vec<Box<dyn Source>>, alerters: Vec<Box<dyn Alerter>>) -> Self {
        Self {
            sources,
            alerters,
            options: MessageOptions::default(),
        }
    }

    /// Builder: set message rendering options
    pub fn with_options(mut self, options: MessageOptions) -> Self {
        self.options = options;
        self
    }

    /// Run every source once, stopping at the first error
    pub fn run(&mut self, config: &Config) -> Result<RunReport> {
        let mut report = RunReport::default();

        for source in self.sources.iter_mut() {
            let name = source.name().to_string();

            let message = match prepare(source.as_mut(), config, &self.options) {
                Stage::Proceed(m) => m,
                Stage::Skip(reason @ SkipReason::Empty(_)) => {
                    log::info!("{}", reason);
                    report.skipped.push(name);
                    continue;
                }
                Stage::Skip(reason @ SkipReason::Disabled(_)) => {
                    log::debug!("{}", reason);
                    report.disabled.push(name);
                    continue;
                }
                Stage::Abort(e) => return Err(e),
            };

            for alerter in self.alerters.iter_mut() {
                match deliver(alerter.as_mut(), &name, &message, config) {
                    Stage::Proceed(delivery) => {
                        log::info!(
                            "{} alert success for channel: {}",
                            delivery.alerter,
                            delivery.channel
                        );
                        report.deliveries.push(delivery);
                    }
                    Stage::Skip(reason) => log::debug!("{}", reason),
                    Stage::Abort(e) => return Err(e),
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{CallLog, FailAt, ScriptedAlerter, ScriptedSource};

    fn calls(log: &CallLog) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[test]
    fn test_full_pipeline_order() {
        let log = CallLog::default();
        let alerter = ScriptedAlerter::new("Slack", log.clone());
        let delivered = alerter.delivered();

        let mut runner = Runner::new(
            vec![
                Box::new(ScriptedSource::new("GitLab", 2, log.clone())),
                Box::new(ScriptedSource::new("RSS", 1, log.clone())),
            ],
            vec![Box::new(alerter)],
        );

        let report = runner.run(&Config::default()).unwrap();
        assert_eq!(
            calls(&log),
            vec![
                "GitLab:validate",
                "GitLab:load",
                "GitLab:render",
                "Slack:load",
                "Slack:alert",
                "RSS:validate",
                "RSS:load",
                "RSS:render",
                "Slack:load",
                "Slack:alert",
            ]
        );
        assert_eq!(report.deliveries.len(), 2);
        assert_eq!(report.deliveries[0].source, "GitLab");
        assert_eq!(report.deliveries[0].channel, "#test");

        let delivered = delivered.lock().unwrap();
        assert_eq!(delivered[0].attachments.len(), 2);
        assert_eq!(delivered[1].attachments.len(), 1);
    }

    #[test]
    fn test_empty_message_skips_alerters_and_continues() {
        let log = CallLog::default();
        let mut runner = Runner::new(
            vec![
                Box::new(ScriptedSource::new("GitLab", 0, log.clone())),
                Box::new(ScriptedSource::new("RSS", 1, log.clone())),
            ],
            vec![Box::new(ScriptedAlerter::new("Slack", log.clone()))],
        );

        let report = runner.run(&Config::default()).unwrap();
        assert_eq!(report.skipped, vec!["GitLab".to_string()]);
        assert_eq!(report.deliveries.len(), 1);
        assert_eq!(report.deliveries[0].source, "RSS");
        assert_eq!(
            calls(&log).iter().filter(|c| c.as_str() == "Slack:alert").count(),
            1
        );
    }

    #[test]
    fn test_disabled_source_is_untouched() {
        let log = CallLog::default();
        let mut runner = Runner::new(
            vec![Box::new(ScriptedSource::new("GitLab", 1, log.clone()).disabled())],
            vec![Box::new(ScriptedAlerter::new("Slack", log.clone()))],
        );

        let report = runner.run(&Config::default()).unwrap();
        assert!(calls(&log).is_empty());
        assert_eq!(report.disabled, vec!["GitLab".to_string()]);
    }

    #[test]
    fn test_disabled_alerter_is_untouched() {
        let log = CallLog::default();
        let mut runner = Runner::new(
            vec![Box::new(ScriptedSource::new("GitLab", 1, log.clone()))],
            vec![Box::new(ScriptedAlerter::new("Slack", log.clone()).disabled())],
        );

        let report = runner.run(&Config::default()).unwrap();
        assert!(report.deliveries.is_empty());
        assert!(!calls(&log).iter().any(|c| c.starts_with("Slack")));
    }

    #[test]
    fn test_validate_failure_aborts_before_load() {
        let log = CallLog::default();
        let mut runner = Runner::new(
            vec![
                Box::new(ScriptedSource::new("GitLab", 1, log.clone()).failing_at(FailAt::Validate)),
                Box::new(ScriptedSource::new("RSS", 1, log.clone())),
            ],
            vec![Box::new(ScriptedAlerter::new("Slack", log.clone()))],
        );

        let err = runner.run(&Config::default()).unwrap_err();
        assert!(matches!(err, AppError::Validate { ref integration, .. } if integration == "GitLab"));
        assert_eq!(calls(&log), vec!["GitLab:validate"]);
    }

    #[test]
    fn test_load_failure_aborts_later_sources() {
        let log = CallLog::default();
        let mut runner = Runner::new(
            vec![
                Box::new(ScriptedSource::new("GitLab", 1, log.clone()).failing_at(FailAt::Load)),
                Box::new(ScriptedSource::new("RSS", 1, log.clone())),
            ],
            vec![Box::new(ScriptedAlerter::new("Slack", log.clone()))],
        );

        let err = runner.run(&Config::default()).unwrap_err();
        assert!(matches!(err, AppError::Load { .. }));
        assert!(!calls(&log).iter().any(|c| c.starts_with("RSS")));
    }

    #[test]
    fn test_render_failure_aborts() {
        let log = CallLog::default();
        let mut runner = Runner::new(
            vec![Box::new(ScriptedSource::new("RSS", 1, log.clone()).failing_at(FailAt::Render))],
            vec![Box::new(ScriptedAlerter::new("Slack", log.clone()))],
        );

        let err = runner.run(&Config::default()).unwrap_err();
        assert!(matches!(err, AppError::Render { .. }));
        assert!(err.to_string().contains("RSS is not loaded"));
    }

    #[test]
    fn test_alerter_load_failure_aborts() {
        let log = CallLog::default();
        let mut runner = Runner::new(
            vec![Box::new(ScriptedSource::new("GitLab", 1, log.clone()))],
            vec![Box::new(
                ScriptedAlerter::new("Slack", log.clone()).failing_at(FailAt::AlerterLoad),
            )],
        );

        let err = runner.run(&Config::default()).unwrap_err();
        match err {
            AppError::AlerterLoad {
                alerter,
                integration,
                ..
            } => {
                assert_eq!(alerter, "Slack");
                assert_eq!(integration, "GitLab");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(!calls(&log).contains(&"Slack:alert".to_string()));
    }

    #[test]
    fn test_delivery_failure_stops_run() {
        let log = CallLog::default();
        let mut runner = Runner::new(
            vec![
                Box::new(ScriptedSource::new("GitLab", 1, log.clone())),
                Box::new(ScriptedSource::new("RSS", 1, log.clone())),
            ],
            vec![
                Box::new(ScriptedAlerter::new("Slack", log.clone()).failing_at(FailAt::Alert)),
                Box::new(ScriptedAlerter::new("Second", log.clone())),
            ],
        );

        let err = runner.run(&Config::default()).unwrap_err();
        assert!(matches!(err, AppError::Alert { .. }));
        assert!(err.to_string().contains("no_service"));
        assert!(!calls(&log).iter().any(|c| c.starts_with("Second") || c.starts_with("RSS")));
    }

    #[test]
    fn test_prepare_reports_skip_reason() {
        let log = CallLog::default();
        let mut source = ScriptedSource::new("GitLab", 0, log);
        match prepare(&mut source, &Config::default(), &MessageOptions::default()) {
            Stage::Skip(reason) => {
                assert_eq!(reason, SkipReason::Empty("GitLab".to_string()));
                assert_eq!(
                    reason.to_string(),
                    "0 attachments found for GitLab, no need to alert"
                );
            }
            other => panic!("unexpected stage: {:?}", other),
        }
    }

    #[test]
    fn test_prepare_disabled_is_distinct_from_empty() {
        let log = CallLog::default();
        let mut source = ScriptedSource::new("RSS", 3, log.clone()).disabled();
        match prepare(&mut source, &Config::default(), &MessageOptions::default()) {
            Stage::Skip(reason) => assert_eq!(reason, SkipReason::Disabled("RSS".to_string())),
            other => panic!("unexpected stage: {:?}", other),
        }
        assert!(calls(&log).is_empty());
    }

    #[test]
    fn test_deliver_skips_disabled_alerter() {
        let log = CallLog::default();
        let mut alerter = ScriptedAlerter::new("Slack", log.clone()).disabled();
        let stage = deliver(&mut alerter, "GitLab", &Message::default(), &Config::default());
        assert!(matches!(stage, Stage::Skip(SkipReason::Disabled(ref n)) if n == "Slack"));
        assert!(calls(&log).is_empty());
    }

    #[test]
    fn test_colour_option_reaches_attachments() {
        let log = CallLog::default();
        let alerter = ScriptedAlerter::new("Slack", log.clone());
        let delivered = alerter.delivered();
        let mut runner = Runner::new(
            vec![Box::new(ScriptedSource::new("GitLab", 1, log))],
            vec![Box::new(alerter)],
        )
        .with_options(MessageOptions {
            color: "warning".to_string(),
        });

        runner.run(&Config::default()).unwrap();
        assert_eq!(delivered.lock().unwrap()[0].attachments[0].color, "warning");
    }
}
