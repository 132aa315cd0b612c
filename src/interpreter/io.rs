use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Supplies text for `INPUT` statements. The evaluator calls this at exactly
/// one point and does no other work until it returns, so an implementation
/// may block (for example on a terminal). `None` means no input is available.
pub trait InputProvider {
    fn request_input(&mut self, prompt: &str) -> Option<String>;
}

/// Receives one fully formatted line per executed `OUTPUT` statement.
pub trait OutputSink {
    fn emit(&mut self, line: &str);
}

impl<T: InputProvider + ?Sized> InputProvider for &mut T {
    fn request_input(&mut self, prompt: &str) -> Option<String> {
        (**self).request_input(prompt)
    }
}

impl<T: OutputSink + ?Sized> OutputSink for &mut T {
    fn emit(&mut self, line: &str) {
        (**self).emit(line)
    }
}

impl<T: InputProvider + ?Sized> InputProvider for Box<T> {
    fn request_input(&mut self, prompt: &str) -> Option<String> {
        (**self).request_input(prompt)
    }
}

impl<T: OutputSink + ?Sized> OutputSink for Box<T> {
    fn emit(&mut self, line: &str) {
        (**self).emit(line)
    }
}

/// Pre-recorded answers, handed out in order regardless of the prompt.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    values: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    /// Prompts requested so far, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl InputProvider for ScriptedInput {
    fn request_input(&mut self, prompt: &str) -> Option<String> {
        self.prompts.push(prompt.to_string());
        self.values.pop_front()
    }
}

/// For programs that are not expected to read anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputProvider for NoInput {
    fn request_input(&mut self, _prompt: &str) -> Option<String> {
        None
    }
}

/// Interactive input: prompts on stderr, reads one line from stdin.
#[derive(Debug, Default)]
pub struct StdinInput;

impl InputProvider for StdinInput {
    fn request_input(&mut self, prompt: &str) -> Option<String> {
        let mut stderr = io::stderr();
        let _ = write!(stderr, "? {}: ", prompt);
        let _ = stderr.flush();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\n', '\r']).to_string()),
        }
    }
}

impl OutputSink for Vec<String> {
    fn emit(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

/// Writes each line to stdout as soon as it is emitted.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&mut self, line: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", line);
        let _ = stdout.flush();
    }
}
