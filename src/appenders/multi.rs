//! Fan-out appender writing every line to several destinations

use crate::core::{Appender, Result};

/// Writes each line to every inner appender
///
/// A failing destination does not stop the others; the first error is
/// returned after all of them have been tried.
pub struct MultiAppender {
    appenders: Vec<Box<dyn Appender>>,
}

impl MultiAppender {
    pub fn new(appenders: Vec<Box<dyn Appender>>) -> Self {
        Self { appenders }
    }

    pub fn len(&self) -> usize {
        self.appenders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appenders.is_empty()
    }

    fn each(&mut self, mut op: impl FnMut(&mut dyn Appender) -> Result<()>) -> Result<()> {
        let mut first_error = None;
        for appender in self.appenders.iter_mut() {
            if let Err(e) = op(appender.as_mut()) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl Appender for MultiAppender {
    fn append(&mut self, line: &str) -> Result<()> {
        self.each(|appender| appender.append(line))
    }

    fn flush(&mut self) -> Result<()> {
        self.each(|appender| appender.flush())
    }

    fn name(&self) -> &str {
        "multi"
    }
}
