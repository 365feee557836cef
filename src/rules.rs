//! Extraction rule catalog for `nvme smart-log` output.
//!
//! Every metric the exporter knows about is described by an [`ExtractionRule`]:
//! the label printed by nvme-cli, the shape of the value that follows the
//! colon, and whether the value is a temperature that may carry a unit suffix.
//! Rules are plain data; [`RuleCatalog::compile`] turns them into
//! case-insensitive regexes once at startup.

use regex::Regex;
use std::collections::HashSet;

/// Shape of the value captured after `label :`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// Bare digits, e.g. `power_cycles : 12`.
    Digits,
    /// Digits with optional thousands separators, e.g. `1,234,567`.
    Grouped,
    /// Digits followed by a percent sign, e.g. `available_spare : 100%`.
    Percent,
}

impl Capture {
    fn pattern(self) -> &'static str {
        match self {
            Capture::Digits => r"(\d+)",
            Capture::Grouped => r"([\d,]+)",
            Capture::Percent => r"(\d+)%",
        }
    }
}

/// A single declarative extraction rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionRule {
    /// Metric name, unique within a catalog.
    pub name: &'static str,
    /// Label text as printed by nvme-cli. Word separators (spaces or
    /// underscores) match any run of whitespace and underscores.
    pub label: &'static str,
    /// Shape of the value after the colon.
    pub capture: Capture,
    /// Temperature-family rules also capture an optional `C`/`F`/`K` unit.
    pub temperature: bool,
}

impl ExtractionRule {
    pub const fn plain(name: &'static str, label: &'static str, capture: Capture) -> Self {
        Self {
            name,
            label,
            capture,
            temperature: false,
        }
    }

    pub const fn temperature(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            capture: Capture::Digits,
            temperature: true,
        }
    }

    /// Builds the regex source for this rule.
    pub fn pattern(&self) -> String {
        let label = self
            .label
            .split(|c: char| c.is_whitespace() || c == '_')
            .filter(|word| !word.is_empty())
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"[\s_]*");

        let mut pattern = format!(r"(?i){}\s*:\s*{}", label, self.capture.pattern());
        if self.temperature {
            pattern.push_str(r"\s*[°º]?\s*([CFK])?");
        }
        pattern
    }
}

/// Rules applied to every `nvme smart-log` output, in export order.
pub const SMART_LOG_RULES: &[ExtractionRule] = &[
    ExtractionRule::plain("critical_warning", "critical_warning", Capture::Digits),
    ExtractionRule::temperature("temperature", "temperature"),
    ExtractionRule::plain("available_spare", "available_spare", Capture::Percent),
    ExtractionRule::plain(
        "available_spare_threshold",
        "available_spare_threshold",
        Capture::Percent,
    ),
    ExtractionRule::plain("percentage_used", "percentage_used", Capture::Percent),
    ExtractionRule::plain("data_units_read", "data units read", Capture::Grouped),
    ExtractionRule::plain("data_units_written", "data units written", Capture::Grouped),
    ExtractionRule::plain("host_read_commands", "host read commands", Capture::Grouped),
    ExtractionRule::plain("host_write_commands", "host write commands", Capture::Grouped),
    ExtractionRule::plain("controller_busy_time", "controller busy time", Capture::Grouped),
    ExtractionRule::plain("power_cycles", "power cycles", Capture::Grouped),
    ExtractionRule::plain("power_on_hours", "power on hours", Capture::Grouped),
    ExtractionRule::plain("unsafe_shutdowns", "unsafe shutdowns", Capture::Grouped),
    ExtractionRule::plain("media_errors", "media errors", Capture::Grouped),
    ExtractionRule::plain("num_err_log_entries", "num err log entries", Capture::Grouped),
    ExtractionRule::temperature("temperature_sensor_1", "temperature sensor 1"),
    ExtractionRule::temperature("temperature_sensor_2", "temperature sensor 2"),
    ExtractionRule::plain(
        "thermal_mgmt_t1_trans",
        "thermal management T1 Trans Count",
        Capture::Digits,
    ),
    ExtractionRule::plain(
        "thermal_mgmt_t2_trans",
        "thermal management T2 Trans Count",
        Capture::Digits,
    ),
    ExtractionRule::plain(
        "thermal_mgmt_t1_time",
        "thermal management T1 Total Time",
        Capture::Digits,
    ),
    ExtractionRule::plain(
        "thermal_mgmt_t2_time",
        "thermal management T2 Total Time",
        Capture::Digits,
    ),
];

/// Errors raised while compiling a rule catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Duplicate rule name: {0}")]
    DuplicateName(String),

    #[error("Invalid pattern for rule {name}: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}

/// A rule paired with its compiled regex.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub rule: ExtractionRule,
    pub regex: Regex,
}

/// Immutable set of compiled rules, shared read-only by all scrapes.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: Vec<CompiledRule>,
}

impl RuleCatalog {
    /// Compiles the given rules, preserving their order.
    pub fn compile(rules: &[ExtractionRule]) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let mut compiled = Vec::with_capacity(rules.len());

        for rule in rules {
            if !seen.insert(rule.name) {
                return Err(CatalogError::DuplicateName(rule.name.to_string()));
            }
            let regex = Regex::new(&rule.pattern()).map_err(|source| {
                CatalogError::InvalidPattern {
                    name: rule.name.to_string(),
                    source,
                }
            })?;
            compiled.push(CompiledRule { rule: *rule, regex });
        }

        Ok(Self { rules: compiled })
    }

    /// Compiles [`SMART_LOG_RULES`].
    pub fn smart_log() -> Result<Self, CatalogError> {
        Self::compile(SMART_LOG_RULES)
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
