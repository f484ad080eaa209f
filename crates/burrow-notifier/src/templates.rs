use handlebars::Handlebars;

const OPEN_SUBJECT: &str = "[Burrow] {{cluster}}/{{group}} is {{status}}";
const OPEN_BODY: &str = include_str!("templates/open_body.hbs");
const REMINDER_SUBJECT: &str = "[Burrow] {{cluster}}/{{group}} is still {{status}}";
const REMINDER_BODY: &str = include_str!("templates/reminder_body.hbs");
const CHANGE_SUBJECT: &str = "[Burrow] {{cluster}}/{{group}} changed to {{status}}";
const CHANGE_BODY: &str = include_str!("templates/change_body.hbs");
const CLOSE_SUBJECT: &str = "[Burrow] {{cluster}}/{{group}} recovered";
const CLOSE_BODY: &str = include_str!("templates/close_body.hbs");

/// Registers the four built-in open/reminder/change/close templates
/// (`SPEC_FULL.md` §4.4's `EmailSink`).
pub fn registry() -> Result<Handlebars<'static>, handlebars::TemplateError> {
    let mut hb = Handlebars::new();
    hb.set_strict_mode(true);
    hb.register_template_string("open-subject", OPEN_SUBJECT)?;
    hb.register_template_string("open-body", OPEN_BODY)?;
    hb.register_template_string("reminder-subject", REMINDER_SUBJECT)?;
    hb.register_template_string("reminder-body", REMINDER_BODY)?;
    hb.register_template_string("change-subject", CHANGE_SUBJECT)?;
    hb.register_template_string("change-body", CHANGE_BODY)?;
    hb.register_template_string("close-subject", CLOSE_SUBJECT)?;
    hb.register_template_string("close-body", CLOSE_BODY)?;
    Ok(hb)
}

pub fn names(kind: crate::event::EventKind) -> (&'static str, &'static str) {
    use crate::event::EventKind::*;
    match kind {
        Open => ("open-subject", "open-body"),
        Reminder => ("reminder-subject", "reminder-body"),
        Change => ("change-subject", "change-body"),
        Close => ("close-subject", "close-body"),
    }
}
