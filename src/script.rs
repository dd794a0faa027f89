use std::time::Duration;

use thiserror::Error as ThisError;

use crate::command::Command;

#[derive(Debug, ThisError, PartialEq)]
pub enum ScriptError {
    #[error("script {script}: step {step} jumps to unknown label {label}")]
    UnknownLabel {
        script: &'static str,
        step: &'static str,
        label: &'static str,
    },
    #[error("script {script}: label {label} is used by more than one step")]
    DuplicateLabel {
        script: &'static str,
        label: &'static str,
    },
}

/// A transcript line that did not match what the script expected.
#[derive(Debug, ThisError, PartialEq)]
#[error("line {line}: expected {expected:?}, got {actual:?}")]
pub struct Mismatch {
    /// One-based line number in the transcript.
    pub line: usize,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

/// Where to go once a step has its reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Next {
    /// The following step, in order. Past the last step the run is complete.
    Continue,
    /// The step with the given label.
    Goto(&'static str),
    /// End the run here.
    Stop,
}

/// Message text printed for a step. `{reply}` is replaced by the rendered reply (or the error text
/// when the command failed) and `{0}`, `{1}`, ... by the command's arguments. `{{` and `}}` print
/// literal braces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Template(pub &'static str);

impl Template {
    pub fn render(&self, args: &[String], reply: &str) -> String {
        let src = self.0;
        let mut out = String::with_capacity(src.len() + reply.len());
        let mut rest = src;

        while let Some(start) = rest.find(|c: char| c == '{' || c == '}') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];

            if tail.starts_with("{{") {
                out.push('{');
                rest = &tail[2..];
                continue;
            }
            if tail.starts_with("}}") {
                out.push('}');
                rest = &tail[2..];
                continue;
            }

            let placeholder = tail
                .strip_prefix('{')
                .and_then(|t| t.find('}').map(|end| &t[..end]));

            match placeholder {
                Some("reply") => {
                    out.push_str(reply);
                    rest = &tail["{reply}".len()..];
                }
                Some(index) => match index.parse::<usize>().ok().and_then(|i| args.get(i)) {
                    Some(arg) => {
                        out.push_str(arg);
                        rest = &tail[index.len() + 2..];
                    }
                    None => {
                        out.push_str(&tail[..1]);
                        rest = &tail[1..];
                    }
                },
                None => {
                    out.push_str(&tail[..1]);
                    rest = &tail[1..];
                }
            }
        }

        out.push_str(rest);
        out
    }
}

/// One command of a script, along with how to report it and what to do next.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub label: &'static str,
    pub command: Command,
    pub note: Option<&'static str>,
    pub delay: Option<Duration>,
    pub accepted: Template,
    pub rejected: Template,
    pub on_success: Next,
    pub on_failure: Next,
}

impl Step {
    /// A step that continues when the reply is positive and stops otherwise.
    pub fn new(label: &'static str, command: Command) -> Step {
        Step {
            label,
            command,
            note: None,
            delay: None,
            accepted: Template("{reply}"),
            rejected: Template("{reply}"),
            on_success: Next::Continue,
            on_failure: Next::Stop,
        }
    }

    pub fn accepted(mut self, template: &'static str) -> Step {
        self.accepted = Template(template);
        self
    }

    pub fn rejected(mut self, template: &'static str) -> Step {
        self.rejected = Template(template);
        self
    }

    pub fn on_success(mut self, next: Next) -> Step {
        self.on_success = next;
        self
    }

    pub fn on_failure(mut self, next: Next) -> Step {
        self.on_failure = next;
        self
    }

    /// Printed before the step runs (and before its delay).
    pub fn note(mut self, note: &'static str) -> Step {
        self.note = Some(note);
        self
    }

    pub fn delay(mut self, delay: Duration) -> Step {
        self.delay = Some(delay);
        self
    }

    fn targets(&self) -> impl Iterator<Item = &'static str> {
        [self.on_success, self.on_failure]
            .into_iter()
            .filter_map(|next| match next {
                Next::Goto(label) => Some(label),
                _ => None,
            })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expect {
    Line(&'static str),
    /// Only the start of the line is known, the rest depends on server-side ordering or randomness.
    Prefix(&'static str),
}

impl Expect {
    fn matches(&self, line: &str) -> bool {
        match self {
            Expect::Line(expected) => line == *expected,
            Expect::Prefix(prefix) => line.starts_with(prefix),
        }
    }

    fn describe(&self) -> String {
        match self {
            Expect::Line(expected) => expected.to_string(),
            Expect::Prefix(prefix) => format!("{}...", prefix),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Script {
    pub name: &'static str,
    pub banner: bool,
    pub steps: Vec<Step>,
    pub expected: Vec<Expect>,
}

impl Script {
    pub fn new(name: &'static str) -> Script {
        Script {
            name,
            banner: false,
            steps: Vec::new(),
            expected: Vec::new(),
        }
    }

    /// Wraps the transcript in `--- BEGIN ---` / `--- END ---` lines.
    pub fn banner(mut self) -> Script {
        self.banner = true;
        self
    }

    pub fn step(mut self, step: Step) -> Script {
        self.steps.push(step);
        self
    }

    pub fn expect_line(mut self, line: &'static str) -> Script {
        self.expected.push(Expect::Line(line));
        self
    }

    pub fn expect_prefix(mut self, prefix: &'static str) -> Script {
        self.expected.push(Expect::Prefix(prefix));
        self
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.steps.iter().position(|step| step.label == label)
    }

    /// Checks that labels are unique and that every jump lands on a step of this script.
    pub fn validate(&self) -> Result<(), ScriptError> {
        for (i, step) in self.steps.iter().enumerate() {
            if self.steps[..i].iter().any(|s| s.label == step.label) {
                return Err(ScriptError::DuplicateLabel {
                    script: self.name,
                    label: step.label,
                });
            }
        }

        for step in &self.steps {
            if let Some(label) = step.targets().find(|label| self.position(label).is_none()) {
                return Err(ScriptError::UnknownLabel {
                    script: self.name,
                    step: step.label,
                    label,
                });
            }
        }

        Ok(())
    }

    pub fn uses_multi_key_commands(&self) -> bool {
        self.steps.iter().any(|step| step.command.is_multi_key())
    }

    /// Compares a transcript with the expected lines, reporting the first difference.
    pub fn verify<S: AsRef<str>>(&self, transcript: &[S]) -> Result<(), Mismatch> {
        let len = transcript.len().max(self.expected.len());

        for i in 0..len {
            let expected = self.expected.get(i);
            let actual = transcript.get(i).map(AsRef::as_ref);

            let ok = match (expected, actual) {
                (Some(expected), Some(actual)) => expected.matches(actual),
                _ => false,
            };

            if !ok {
                return Err(Mismatch {
                    line: i + 1,
                    expected: expected.map(Expect::describe),
                    actual: actual.map(str::to_string),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Shape;

    fn args(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn render_reply_and_args() {
        let template = Template("lset: {0}[{1}] {2} ({reply})");

        let line = template.render(&args(&["blog:recent_posts", "0", "1001"]), "OK");

        assert_eq!(line, "lset: blog:recent_posts[0] 1001 (OK)");
    }

    #[test]
    fn render_escaped_and_unknown_placeholders() {
        let template = Template("{{literal}} {9} {name} }");

        let line = template.render(&args(&["a"]), "r");

        assert_eq!(line, "{literal} {9} {name} }");
    }

    #[test]
    fn render_multiline() {
        let template = Template("getset: {0} was {reply}\ngetset: {0} is now {1}");

        let line = template.render(&args(&["k", "new"]), "old");

        assert_eq!(line, "getset: k was old\ngetset: k is now new");
    }

    fn ping(label: &'static str) -> Step {
        Step::new(label, Command::new("PING", Shape::Status))
    }

    #[test]
    fn validate_unknown_label() {
        let script = Script::new("test")
            .step(ping("a").on_failure(Next::Goto("missing")))
            .step(ping("b"));

        assert_eq!(
            script.validate(),
            Err(ScriptError::UnknownLabel {
                script: "test",
                step: "a",
                label: "missing"
            })
        );
    }

    #[test]
    fn validate_duplicate_label() {
        let script = Script::new("test").step(ping("a")).step(ping("a"));

        assert_eq!(
            script.validate(),
            Err(ScriptError::DuplicateLabel {
                script: "test",
                label: "a"
            })
        );
    }

    #[test]
    fn validate_ok() {
        let script = Script::new("test")
            .step(ping("a").on_success(Next::Goto("b")))
            .step(ping("b").on_success(Next::Goto("b")));

        assert_eq!(script.validate(), Ok(()));
        assert_eq!(script.position("b"), Some(1));
    }

    #[test]
    fn verify_exact_and_prefix() {
        let script = Script::new("test")
            .expect_line("sadd: friends (3)")
            .expect_prefix("smembers: friends ");

        assert_eq!(
            script.verify(&["sadd: friends (3)", "smembers: friends Joe,Bob,Jane"]),
            Ok(())
        );
    }

    #[test]
    fn verify_reports_first_difference() {
        let script = Script::new("test")
            .expect_line("a")
            .expect_line("b");

        assert_eq!(
            script.verify(&["a", "c"]),
            Err(Mismatch {
                line: 2,
                expected: Some("b".to_string()),
                actual: Some("c".to_string()),
            })
        );
    }

    #[test]
    fn verify_missing_and_surplus_lines() {
        let script = Script::new("test").expect_line("a").expect_line("b");

        assert_eq!(
            script.verify(&["a"]),
            Err(Mismatch {
                line: 2,
                expected: Some("b".to_string()),
                actual: None,
            })
        );
        assert_eq!(
            script.verify(&["a", "b", "c"]),
            Err(Mismatch {
                line: 3,
                expected: None,
                actual: Some("c".to_string()),
            })
        );
    }
}
