//! Marker scanning for event files.
//!
//! Scanning never copies or alters file content; it records line spans
//! and extracted metadata so the rewriter can splice replacements while
//! leaving every non-block byte untouched.

use regex::{Regex, RegexBuilder};

use crate::config::MarkerConfig;

/// Compiled marker matchers. The three markers are literal lines
/// compared case-insensitively after trimming; the model and comment
/// patterns are regexes from the configuration.
#[derive(Debug, Clone)]
pub struct MarkerSet {
    library: String,
    start: String,
    end: String,
    model_re: Regex,
    comment_re: Regex,
}

impl MarkerSet {
    pub fn from_config(config: &MarkerConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            library: config.library_marker.trim().to_string(),
            start: config.start_marker.trim().to_string(),
            end: config.end_marker.trim().to_string(),
            model_re: RegexBuilder::new(&config.model_pattern)
                .case_insensitive(true)
                .build()?,
            comment_re: Regex::new(&config.comment_pattern)?,
        })
    }

    pub fn is_library(&self, line: &str) -> bool {
        line.trim().eq_ignore_ascii_case(&self.library)
    }

    pub fn is_start(&self, line: &str) -> bool {
        line.trim().eq_ignore_ascii_case(&self.start)
    }

    pub fn is_end(&self, line: &str) -> bool {
        line.trim().eq_ignore_ascii_case(&self.end)
    }

    /// Extract the referenced model name from a reference line.
    pub fn model_reference(&self, line: &str) -> Option<String> {
        self.model_re
            .captures(line)
            .map(|caps| caps[1].trim().to_string())
    }

    /// Extract the text of a free-form comment line.
    pub fn comment_text(&self, line: &str) -> Option<String> {
        self.comment_re
            .captures(line)
            .map(|caps| caps[1].trim_end().to_string())
    }
}

/// One marker-delimited block, by line index into the scanned file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiBlock {
    /// Line index of the start marker.
    pub start_line: usize,
    /// Line index of the end marker (the last one, when repeated).
    pub end_line: usize,
    /// Referenced model name, if a reference line was found.
    pub model: Option<String>,
    /// Free-form comment lines carried verbatim (terminators stripped),
    /// in order of appearance, excluding the reference line and marker
    /// lines.
    pub comments: Vec<String>,
    /// Leading whitespace of the start marker line; generated lines
    /// reuse it.
    pub indent: String,
}

/// Scan result. `lines` holds raw lines with their original
/// terminators so untouched spans can be emitted byte-for-byte.
#[derive(Debug)]
pub struct ScannedFile {
    pub lines: Vec<String>,
    pub has_library: bool,
    pub blocks: Vec<AiBlock>,
    /// Start-marker line of a block still open at end of file, if any.
    pub unterminated: Option<usize>,
}

enum State {
    Seeking,
    InBlock(AiBlock),
}

/// Walk the file once, collecting blocks.
///
/// Repeated start markers inside a block and repeated end markers after
/// one are tolerated with a warning; the block collapses to the first
/// start and last end. A stray end marker outside any block passes
/// through as ordinary content.
pub fn scan(markers: &MarkerSet, content: &str) -> ScannedFile {
    let lines: Vec<String> = content.split_inclusive('\n').map(str::to_string).collect();

    let mut has_library = false;
    let mut blocks = Vec::new();
    let mut state = State::Seeking;

    for (index, raw) in lines.iter().enumerate() {
        if markers.is_library(raw) {
            has_library = true;
            continue;
        }
        state = match state {
            State::Seeking => {
                if markers.is_start(raw) {
                    let indent: String = raw
                        .chars()
                        .take_while(|c| c.is_whitespace() && *c != '\n')
                        .collect();
                    State::InBlock(AiBlock {
                        start_line: index,
                        end_line: index,
                        model: None,
                        comments: Vec::new(),
                        indent,
                    })
                } else {
                    if markers.is_end(raw) {
                        log::warn!("stray end marker at line {}", index + 1);
                    }
                    State::Seeking
                }
            }
            State::InBlock(mut block) => {
                if markers.is_end(raw) {
                    block.end_line = index;
                    // Consecutive end markers extend the block.
                    if lines.get(index + 1).is_some_and(|l| markers.is_end(l)) {
                        log::warn!("repeated end marker at line {}", index + 2);
                        State::InBlock(block)
                    } else {
                        blocks.push(block);
                        State::Seeking
                    }
                } else {
                    if markers.is_start(raw) {
                        log::warn!("repeated start marker at line {}", index + 1);
                    } else if let Some(model) = markers.model_reference(raw) {
                        if block.model.is_none() {
                            block.model = Some(model);
                        } else {
                            log::warn!("extra model reference at line {} ignored", index + 1);
                        }
                    } else if markers.comment_text(raw).is_some() {
                        block
                            .comments
                            .push(raw.trim_end_matches(['\r', '\n']).to_string());
                    }
                    State::InBlock(block)
                }
            }
        };
    }

    let unterminated = match state {
        State::InBlock(block) => {
            log::warn!("block at line {} never closed", block.start_line + 1);
            Some(block.start_line)
        }
        State::Seeking => None,
    };

    ScannedFile {
        lines,
        has_library,
        blocks,
        unterminated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> MarkerSet {
        MarkerSet::from_config(&MarkerConfig::default()).unwrap()
    }

    const SAMPLE: &str = "\
# AI-MODEL-LIB
namespace = test_events

test_events.0001 = {
    option = {
        ai_chance = {
            # AI-START
            # using: {ambitious}
            # prefers expansion wars
            # AI-END
        }
    }
}
";

    #[test]
    fn test_scan_finds_block_and_metadata() {
        let scanned = scan(&markers(), SAMPLE);
        assert!(scanned.has_library);
        assert_eq!(scanned.blocks.len(), 1);
        let block = &scanned.blocks[0];
        assert_eq!(block.model.as_deref(), Some("ambitious"));
        assert_eq!(block.comments, vec!["            # prefers expansion wars"]);
        assert_eq!(block.indent, "            ");
        assert!(scanned.unterminated.is_none());
    }

    #[test]
    fn test_scan_without_library_marker() {
        let scanned = scan(&markers(), "namespace = test\n# AI-START\n# AI-END\n");
        assert!(!scanned.has_library);
        // Blocks are still located; the caller decides to skip the file.
        assert_eq!(scanned.blocks.len(), 1);
    }

    #[test]
    fn test_markers_match_case_insensitively() {
        let m = markers();
        assert!(m.is_start("  # ai-start  "));
        assert!(m.is_end("# Ai-End"));
        assert!(m.is_library("# ai-model-lib\n"));
    }

    #[test]
    fn test_model_reference_extraction() {
        let m = markers();
        assert_eq!(
            m.model_reference("# using: {ambitious}"),
            Some("ambitious".to_string())
        );
        assert_eq!(
            m.model_reference("# USING: { craven }"),
            Some("craven".to_string())
        );
        assert_eq!(m.model_reference("# just a comment"), None);
    }

    #[test]
    fn test_repeated_end_markers_collapse_to_last() {
        let content = "\
# AI-MODEL-LIB
# AI-START
# using: {ambitious}
# AI-END
# AI-END
after
";
        let scanned = scan(&markers(), content);
        assert_eq!(scanned.blocks.len(), 1);
        assert_eq!(scanned.blocks[0].end_line, 4);
    }

    #[test]
    fn test_repeated_start_markers_keep_first() {
        let content = "\
# AI-MODEL-LIB
# AI-START
# AI-START
# using: {ambitious}
# AI-END
";
        let scanned = scan(&markers(), content);
        assert_eq!(scanned.blocks.len(), 1);
        assert_eq!(scanned.blocks[0].start_line, 1);
        assert_eq!(scanned.blocks[0].model.as_deref(), Some("ambitious"));
    }

    #[test]
    fn test_unterminated_block_reported() {
        let content = "# AI-MODEL-LIB\n# AI-START\n# using: {ambitious}\n";
        let scanned = scan(&markers(), content);
        assert!(scanned.blocks.is_empty());
        assert_eq!(scanned.unterminated, Some(1));
    }

    #[test]
    fn test_multiple_blocks() {
        let content = "\
# AI-MODEL-LIB
# AI-START
# using: {a}
# AI-END
middle
# AI-START
# using: {b}
# AI-END
";
        let scanned = scan(&markers(), content);
        assert_eq!(scanned.blocks.len(), 2);
        assert_eq!(scanned.blocks[0].model.as_deref(), Some("a"));
        assert_eq!(scanned.blocks[1].model.as_deref(), Some("b"));
    }
}
