use color_print::cprintln;

use crate::error::Error;

/// One reported defect, tied to the source line that produced it.
#[derive(Debug)]
pub struct Msg {
    pub line_no: usize,
    pub raw: String,
    pub err: Error,
}

/// Errors collected by one pass, in source order.
#[derive(Debug, Default)]
pub struct Msgs(Vec<Msg>);

impl Msgs {
    pub fn new() -> Self {
        Msgs(Vec::new())
    }

    pub fn error(&mut self, line_no: usize, raw: &str, err: Error) {
        self.0.push(Msg {
            line_no,
            raw: raw.to_string(),
            err,
        });
    }

    pub fn count(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Msg> {
        self.0.iter()
    }

    pub fn dump(&self, path: &str) {
        for msg in &self.0 {
            cprintln!("<red,bold>error</>: {}", msg.err);
            cprintln!("     <blue>--></> <underline>{}:{}</>", path, msg.line_no);
            cprintln!("      <blue>|</>");
            cprintln!(" <blue>{:>4} |</> {}", msg.line_no, msg.raw);
            cprintln!("      <blue>|</>");
        }
    }
}
