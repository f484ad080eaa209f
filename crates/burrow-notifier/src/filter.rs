use burrow_model::Severity;
use regex::RegexSet;

/// Per-notifier group filtering, compiled once at construction rather than recompiled per tick
/// (`spec.md` §4.4 point 4, `SPEC_FULL.md` §4.4).
#[derive(Debug)]
pub struct NotifierFilter {
    allow: Option<RegexSet>,
    block: Option<RegexSet>,
    severity_threshold: Severity,
}

impl NotifierFilter {
    pub fn new(allow: &[String], block: &[String], severity_threshold: Severity) -> Result<Self, regex::Error> {
        let allow = if allow.is_empty() { None } else { Some(RegexSet::new(allow)?) };
        let block = if block.is_empty() { None } else { Some(RegexSet::new(block)?) };
        Ok(NotifierFilter { allow, block, severity_threshold })
    }

    /// Group allow/blocklist check, independent of severity — applied to every decision
    /// including CLOSE, since a group that was never allowed to fire should not be silenced by a
    /// severity gate when it recovers.
    pub fn group_allowed(&self, group: &str) -> bool {
        if let Some(block) = &self.block {
            if block.is_match(group) {
                return false;
            }
        }
        match &self.allow {
            Some(allow) => allow.is_match(group),
            None => true,
        }
    }

    pub fn severity_allowed(&self, severity: Severity) -> bool {
        severity >= self.severity_threshold
    }

    /// Convenience combining both checks for firing (non-CLOSE) decisions.
    pub fn permits(&self, group: &str, severity: Severity) -> bool {
        self.group_allowed(group) && self.severity_allowed(severity)
    }
}

impl Default for NotifierFilter {
    fn default() -> Self {
        NotifierFilter { allow: None, block: None, severity_threshold: Severity::Warn }
    }
}
