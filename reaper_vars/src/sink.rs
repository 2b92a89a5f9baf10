use crate::protocol::{DisplayValue, SinkMessage, VariableDeclaration};
use crossbeam_channel::Sender;
use std::io::Write;

/// Consumer of the variable catalog and of value updates.
pub trait OutputSink {
    fn declare(&mut self, variables: &[VariableDeclaration]);
    fn update(&mut self, variable_id: &str, value: DisplayValue);
}

impl<S: OutputSink + ?Sized> OutputSink for Box<S> {
    fn declare(&mut self, variables: &[VariableDeclaration]) {
        (**self).declare(variables)
    }

    fn update(&mut self, variable_id: &str, value: DisplayValue) {
        (**self).update(variable_id, value)
    }
}

/// Forwards everything as [`SinkMessage`]s over a channel.
pub struct ChannelSink {
    tx: Sender<SinkMessage>,
}

impl ChannelSink {
    pub fn new(tx: Sender<SinkMessage>) -> Self {
        Self { tx }
    }

    fn send(&self, msg: SinkMessage) {
        if self.tx.send(msg).is_err() {
            tracing::debug!("sink receiver gone, dropping message");
        }
    }
}

impl OutputSink for ChannelSink {
    fn declare(&mut self, variables: &[VariableDeclaration]) {
        self.send(SinkMessage::Declare {
            variables: variables.to_vec(),
        });
    }

    fn update(&mut self, variable_id: &str, value: DisplayValue) {
        self.send(SinkMessage::Update {
            variable_id: variable_id.to_string(),
            value,
        });
    }
}

/// Writes one JSON document per message.
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, msg: &SinkMessage) {
        if let Err(e) = self.write_line(msg) {
            tracing::warn!("sink write failed: {e}");
        }
    }

    fn write_line(&mut self, msg: &SinkMessage) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, msg)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

impl<W: Write> OutputSink for JsonLinesSink<W> {
    fn declare(&mut self, variables: &[VariableDeclaration]) {
        self.write(&SinkMessage::Declare {
            variables: variables.to_vec(),
        });
    }

    fn update(&mut self, variable_id: &str, value: DisplayValue) {
        self.write(&SinkMessage::Update {
            variable_id: variable_id.to_string(),
            value,
        });
    }
}
