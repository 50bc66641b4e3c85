//! Asking the operator to pick one resource from a list.

use fuzzy_matcher::{skim::SkimMatcherV2, FuzzyMatcher};
use runctl_common::prelude::*;
use std::io::BufRead;

/// How the operator picks a candidate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PickMode {
    /// Choose from a numbered list.
    Interactive,
    /// Type a search query, and take the best match.
    Fuzzy,
}

/// Something which can ask the operator to choose.
pub trait Prompt {
    /// Ask the operator to pick one of `candidates`. Returns `None` if they
    /// decline to choose.
    fn select(
        &mut self,
        kind: ResourceKind,
        mode: PickMode,
        candidates: &[String],
    ) -> Result<Option<String>>;
}

/// A prompt which reads answers from `input` and writes the menu to `output`.
///
/// In the binary, `input` is stdin and `output` is stderr, so that menus
/// never end up in redirected output.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    /// Create a new prompt.
    pub fn new(input: R, output: W) -> TerminalPrompt<R, W> {
        TerminalPrompt { input, output }
    }

    /// Read one line, without the trailing newline. Returns `None` at EOF.
    fn read_answer(&mut self) -> Result<Option<String>> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    fn pick_numbered(
        &mut self,
        kind: ResourceKind,
        candidates: &[String],
    ) -> Result<Option<String>> {
        writeln!(self.output, "Select {}:", kind.singular())?;
        for (i, candidate) in candidates.iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, candidate)?;
        }
        write!(self.output, "Enter a number: ")?;

        let answer = match self.read_answer()? {
            Some(answer) if !answer.is_empty() => answer,
            _ => return Ok(None),
        };
        match answer.parse::<usize>() {
            Ok(n) if n >= 1 && n <= candidates.len() => {
                Ok(Some(candidates[n - 1].clone()))
            }
            _ => {
                debug!("ignoring invalid selection {:?}", answer);
                Ok(None)
            }
        }
    }

    fn pick_fuzzy(
        &mut self,
        kind: ResourceKind,
        candidates: &[String],
    ) -> Result<Option<String>> {
        writeln!(self.output, "{}:", kind.plural())?;
        for candidate in candidates {
            writeln!(self.output, "  {}", candidate)?;
        }
        write!(self.output, "Search {}: ", kind.plural())?;
        let query = match self.read_answer()? {
            Some(query) if !query.is_empty() => query,
            _ => return Ok(None),
        };
        Ok(best_match(&query, candidates).map(str::to_owned))
    }
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
    fn select(
        &mut self,
        kind: ResourceKind,
        mode: PickMode,
        candidates: &[String],
    ) -> Result<Option<String>> {
        match mode {
            PickMode::Interactive => self.pick_numbered(kind, candidates),
            PickMode::Fuzzy => self.pick_fuzzy(kind, candidates),
        }
    }
}

/// The candidate with the best fuzzy score for `query`. Ties go to the
/// earliest candidate.
pub fn best_match<'a>(query: &str, candidates: &'a [String]) -> Option<&'a str> {
    let matcher = SkimMatcherV2::default();
    let mut best: Option<(i64, &str)> = None;
    for candidate in candidates {
        if let Some(score) = matcher.fuzzy_match(candidate, query) {
            trace!("fuzzy score {} for {:?}", score, candidate);
            if best.map_or(true, |(best_score, _)| score > best_score) {
                best = Some((score, candidate));
            }
        }
    }
    best.map(|(_, candidate)| candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<String> {
        vec!["build-main-x7k2".to_owned(), "deploy-staging-p9q".to_owned()]
    }

    fn pick(mode: PickMode, input: &str) -> (Option<String>, String) {
        let mut output = vec![];
        let picked = TerminalPrompt::new(input.as_bytes(), &mut output)
            .select(ResourceKind::PipelineRun, mode, &candidates())
            .unwrap();
        (picked, String::from_utf8(output).unwrap())
    }

    #[test]
    fn numbered_pick() {
        let (picked, menu) = pick(PickMode::Interactive, "2\n");
        assert_eq!(picked.as_deref(), Some("deploy-staging-p9q"));
        assert!(menu.contains("1) build-main-x7k2"));
        assert!(menu.contains("2) deploy-staging-p9q"));
    }

    #[test]
    fn numbered_pick_aborts_on_bad_input() {
        for input in &["", "\n", "0\n", "3\n", "build\n"] {
            assert_eq!(pick(PickMode::Interactive, input).0, None, "{:?}", input);
        }
    }

    #[test]
    fn fuzzy_pick() {
        let (picked, menu) = pick(PickMode::Fuzzy, "stag\n");
        assert_eq!(picked.as_deref(), Some("deploy-staging-p9q"));
        assert!(menu.contains("  build-main-x7k2\n"));
        assert!(menu.contains("  deploy-staging-p9q\n"));
        assert!(menu.ends_with("Search PipelineRuns: "));
        assert_eq!(
            pick(PickMode::Fuzzy, "bld\n").0.as_deref(),
            Some("build-main-x7k2"),
        );
    }

    #[test]
    fn fuzzy_pick_aborts_without_a_match() {
        for input in &["", "\n", "zzzz\n"] {
            assert_eq!(pick(PickMode::Fuzzy, input).0, None, "{:?}", input);
        }
    }

    #[test]
    fn best_match_prefers_earlier_candidates_on_ties() {
        let candidates = vec!["run-a".to_owned(), "run-a".to_owned()];
        assert_eq!(best_match("run", &candidates), Some("run-a"));
        assert_eq!(best_match("", &[]), None);
    }
}
