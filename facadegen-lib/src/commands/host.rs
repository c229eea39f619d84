use std::io::Write;

/// The process streams and exit hook used by the CLI commands
pub trait Host: Send + Sync {
    /// Reports and generated code go here
    fn output(&mut self) -> impl Write;

    /// Diagnostics and violation listings go here
    fn error(&mut self) -> impl Write;

    /// Ends the run with `code`; test hosts record it instead.
    fn exit(&mut self, code: i32);
}

/// Host capturing both streams and the exit code in memory
#[cfg(test)]
pub struct TestHost {
    pub output_buf: Vec<u8>,
    pub error_buf: Vec<u8>,
    pub exit_code: Option<i32>,
}

#[cfg(test)]
impl TestHost {
    pub const fn new() -> Self {
        Self {
            output_buf: Vec::new(),
            error_buf: Vec::new(),
            exit_code: None,
        }
    }

    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }

    pub fn error_str(&self) -> String {
        String::from_utf8_lossy(&self.error_buf).into_owned()
    }
}

#[cfg(test)]
impl Host for TestHost {
    fn output(&mut self) -> impl Write {
        std::io::Cursor::new(&mut self.output_buf)
    }

    fn error(&mut self) -> impl Write {
        std::io::Cursor::new(&mut self.error_buf)
    }

    fn exit(&mut self, code: i32) {
        // In tests, just remember the code
        self.exit_code = Some(code);
    }
}
