//! Vulnerability rule table.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
        };
        f.write_str(s)
    }
}

/// User-supplied rule as it appears in config or a rules file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSpec {
    pub name: String,
    pub severity: Severity,
    pub description: String,
    pub pattern: String,
}

impl RuleSpec {
    pub fn compile(&self) -> Result<VulnerabilityRule, regex::Error> {
        VulnerabilityRule::regex(
            &self.name,
            self.severity,
            &self.description,
            &self.pattern,
        )
    }
}

#[derive(Debug, Clone)]
pub enum Matcher {
    /// Matched independently on every line.
    Regex(Regex),
    /// Stateful tracker for `free(x)` followed by a use of `x`.
    UseAfterFree,
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Regex(re) => f.write_str(re.as_str()),
            Matcher::UseAfterFree => f.write_str("free(x) followed by use of x"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VulnerabilityRule {
    pub name: String,
    pub severity: Severity,
    pub description: String,
    pub matcher: Matcher,
}

impl VulnerabilityRule {
    pub fn regex(
        name: &str,
        severity: Severity,
        description: &str,
        pattern: &str,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.to_string(),
            severity,
            description: description.to_string(),
            matcher: Matcher::Regex(Regex::new(pattern)?),
        })
    }

    pub fn use_after_free() -> Self {
        Self {
            name: "use-after-free".to_string(),
            severity: Severity::High,
            description: "pointer used after it was passed to free()".to_string(),
            matcher: Matcher::UseAfterFree,
        }
    }
}

impl fmt::Display for VulnerabilityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {} - Pattern: {}",
            self.name, self.severity, self.description, self.matcher
        )
    }
}

/// Serializable view of a rule, used by `rules --format json`.
#[derive(Debug, Clone, Serialize)]
pub struct RuleSummary {
    pub name: String,
    pub severity: Severity,
    pub description: String,
    pub pattern: String,
}

impl From<&VulnerabilityRule> for RuleSummary {
    fn from(rule: &VulnerabilityRule) -> Self {
        Self {
            name: rule.name.clone(),
            severity: rule.severity,
            description: rule.description.clone(),
            pattern: rule.matcher.to_string(),
        }
    }
}

const BUILTIN: &[(&str, Severity, &str, &str)] = &[
    (
        "gets",
        Severity::High,
        "gets() reads without a bound and can overflow its buffer",
        r"\bgets\s*\(",
    ),
    (
        "strcpy",
        Severity::High,
        "strcpy() copies without checking the destination size",
        r"\bstrcpy\s*\(",
    ),
    (
        "strcat",
        Severity::High,
        "strcat() appends without checking the destination size",
        r"\bstrcat\s*\(",
    ),
    (
        "sprintf",
        Severity::Medium,
        "sprintf() formats without a destination bound",
        r"\bv?sprintf\s*\(",
    ),
    (
        "scanf-string",
        Severity::Medium,
        "scanf() %s conversion without a field width",
        r#"\b[fs]?scanf\s*\(.*%s"#,
    ),
];

lazy_static! {
    static ref BUILTIN_RULES: Vec<VulnerabilityRule> = BUILTIN
        .iter()
        .map(|(name, severity, description, pattern)| {
            VulnerabilityRule::regex(name, *severity, description, pattern).unwrap()
        })
        .collect();
}

#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<VulnerabilityRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The default table: unbounded reads, unchecked copies and use-after-free.
    pub fn builtin() -> Self {
        let mut set = Self {
            rules: BUILTIN_RULES.clone(),
        };
        set.add_rule(VulnerabilityRule::use_after_free());
        set
    }

    pub fn add_rule(&mut self, rule: VulnerabilityRule) {
        self.rules.push(rule);
    }

    pub fn extend_from_specs(&mut self, specs: &[RuleSpec]) -> Result<(), regex::Error> {
        for spec in specs {
            self.add_rule(spec.compile()?);
        }
        Ok(())
    }

    pub fn rules(&self) -> &[VulnerabilityRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{rule}")?;
        }
        Ok(())
    }
}
