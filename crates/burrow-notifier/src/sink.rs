use std::time::Duration;

use crate::event::NotifierEvent;
use crate::templates;

/// A dispatch target for notifier events, per `spec.md` §4.4: "a sink is any collaborator
/// exposing `Dispatch(event)`". Failures are logged and counted by the caller; a sink must never
/// panic or block indefinitely.
#[async_trait::async_trait]
pub trait Sink: Send + Sync {
    fn name(&self) -> &str;
    async fn dispatch(&self, event: &NotifierEvent) -> anyhow::Result<()>;
}

/// Posts the event as JSON to a configured webhook URL, retrying a bounded number of times
/// within one tick (`SPEC_FULL.md` §4.4).
pub struct HttpSink {
    name: String,
    url: String,
    client: reqwest::Client,
    max_retries: u32,
}

impl HttpSink {
    pub fn new(name: impl Into<String>, url: impl Into<String>, timeout: Duration, max_retries: u32) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpSink { name: name.into(), url: url.into(), client, max_retries })
    }
}

#[async_trait::async_trait]
impl Sink for HttpSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn dispatch(&self, event: &NotifierEvent) -> anyhow::Result<()> {
        let mut attempt = 0;
        loop {
            let result = self.client.post(&self.url).json(event).send().await.and_then(|r| r.error_for_status());
            match result {
                Ok(_) => return Ok(()),
                Err(err) if attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(sink = %self.name, attempt, error = %err, "webhook dispatch failed, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

/// Delivers a rendered email through an HTTP transactional-email API
/// (`SPEC_FULL.md` §4.4; a full SMTP transport is left as a Non-goal extension point).
#[async_trait::async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

/// Posts `{to, subject, body}` to a configured transactional-email HTTP endpoint, matching
/// upstream Burrow's "email" frontend without depending on a specific provider's SDK.
pub struct HttpEmailTransport {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpEmailTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpEmailTransport { endpoint: endpoint.into(), client })
    }
}

#[async_trait::async_trait]
impl EmailTransport for HttpEmailTransport {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        #[derive(serde::Serialize)]
        struct Payload<'a> {
            to: &'a str,
            subject: &'a str,
            body: &'a str,
        }
        self.client
            .post(&self.endpoint)
            .json(&Payload { to, subject, body })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

pub struct EmailSink {
    name: String,
    hb: handlebars::Handlebars<'static>,
    transport: Box<dyn EmailTransport>,
    recipients: Vec<String>,
}

impl EmailSink {
    pub fn new(name: impl Into<String>, transport: Box<dyn EmailTransport>, recipients: Vec<String>) -> anyhow::Result<Self> {
        Ok(EmailSink { name: name.into(), hb: templates::registry()?, transport, recipients })
    }
}

#[async_trait::async_trait]
impl Sink for EmailSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn dispatch(&self, event: &NotifierEvent) -> anyhow::Result<()> {
        let (subject_tpl, body_tpl) = templates::names(event.kind);
        let subject = self.hb.render(subject_tpl, event)?;
        let body = self.hb.render(body_tpl, event)?;
        for to in &self.recipients {
            self.transport.send(to, &subject, &body).await?;
        }
        Ok(())
    }
}
