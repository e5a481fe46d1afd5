use crate::Generator;
use burrow_core::ShortCode;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A generator that replays a fixed list of codes, wrapping around at the end.
///
/// Useful wherever randomness gets in the way: a script that repeats a code
/// already in the store forces a collision on demand.
#[derive(Debug)]
pub struct ScriptedGenerator {
    cursor: AtomicUsize,
    script: Vec<ShortCode>,
}

impl ScriptedGenerator {
    /// Creates a generator replaying `codes` in order.
    ///
    /// An empty script falls back to a single `"a"`.
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut script: Vec<ShortCode> = codes
            .into_iter()
            .map(|code| ShortCode::new_unchecked(code))
            .collect();
        if script.is_empty() {
            script.push(ShortCode::new_unchecked("a"));
        }

        Self {
            cursor: AtomicUsize::new(0),
            script,
        }
    }
}

impl Generator for ScriptedGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        self.script[index % self.script.len()].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_script_in_order_and_wraps() {
        let generator = ScriptedGenerator::new(["aaa", "bbb"]);

        assert_eq!(generator.generate().as_str(), "aaa");
        assert_eq!(generator.generate().as_str(), "bbb");
        assert_eq!(generator.generate().as_str(), "aaa");
    }

    #[test]
    fn empty_script_still_generates() {
        let generator = ScriptedGenerator::new(Vec::<String>::new());

        assert_eq!(generator.generate().as_str(), "a");
    }
}
