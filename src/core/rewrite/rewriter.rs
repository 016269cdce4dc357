//! Splicing rendered weight expressions into event files.

use std::path::Path;

use indexmap::IndexMap;

use super::error::{BlockError, BlockErrorKind};
use super::scanner::{self, AiBlock, MarkerSet, ScannedFile};
use crate::core::render::TriggerSerializer;
use crate::core::resolver::UnifiedModel;

/// Result of rewriting one file's content. `content` equals the input
/// when nothing changed; untouched spans are byte-identical either way.
#[derive(Debug)]
pub struct RewriteOutcome {
    pub content: String,
    pub changed: bool,
    pub has_library: bool,
    pub blocks_found: usize,
    pub blocks_rewritten: usize,
    pub errors: Vec<BlockError>,
}

pub struct BlockRewriter<'a> {
    markers: &'a MarkerSet,
    serializer: &'a TriggerSerializer,
    delete_markers: bool,
}

impl<'a> BlockRewriter<'a> {
    pub fn new(
        markers: &'a MarkerSet,
        serializer: &'a TriggerSerializer,
        delete_markers: bool,
    ) -> Self {
        Self {
            markers,
            serializer,
            delete_markers,
        }
    }

    /// Rewrite every resolvable block in `content`. Blocks that cannot
    /// be rewritten are left byte-identical and reported; `path` is
    /// only used for error reporting.
    ///
    /// A block's interior always becomes: the normalized reference
    /// line, the rendered weight expression, then the comment lines
    /// carried over verbatim. Re-running over already rewritten content
    /// therefore regenerates the same text.
    pub fn rewrite(
        &self,
        path: &Path,
        content: &str,
        resolved: &IndexMap<String, UnifiedModel>,
        failed_models: &[String],
    ) -> RewriteOutcome {
        let scanned = scanner::scan(self.markers, content);
        if !scanned.has_library {
            return RewriteOutcome {
                content: content.to_string(),
                changed: false,
                has_library: false,
                blocks_found: 0,
                blocks_rewritten: 0,
                errors: Vec::new(),
            };
        }

        let mut output = String::with_capacity(content.len());
        let mut errors = Vec::new();
        let mut blocks_rewritten = 0;
        let mut cursor = 0;

        for (index, block) in scanned.blocks.iter().enumerate() {
            for line in &scanned.lines[cursor..block.start_line] {
                output.push_str(line);
            }

            match self.block_model(block, resolved, failed_models) {
                Ok(model) => {
                    self.emit_block(&mut output, &scanned, block, model);
                    blocks_rewritten += 1;
                }
                Err(kind) => {
                    errors.push(BlockError {
                        path: path.to_path_buf(),
                        index,
                        kind,
                    });
                    for line in &scanned.lines[block.start_line..=block.end_line] {
                        output.push_str(line);
                    }
                }
            }
            cursor = block.end_line + 1;
        }

        if let Some(start_line) = scanned.unterminated {
            errors.push(BlockError {
                path: path.to_path_buf(),
                index: scanned.blocks.len(),
                kind: BlockErrorKind::Unterminated,
            });
            debug_assert!(start_line >= cursor);
        }

        for line in &scanned.lines[cursor..] {
            output.push_str(line);
        }

        let changed = output != content;
        RewriteOutcome {
            content: output,
            changed,
            has_library: true,
            blocks_found: scanned.blocks.len() + usize::from(scanned.unterminated.is_some()),
            blocks_rewritten,
            errors,
        }
    }

    fn block_model<'m>(
        &self,
        block: &AiBlock,
        resolved: &'m IndexMap<String, UnifiedModel>,
        failed_models: &[String],
    ) -> Result<&'m UnifiedModel, BlockErrorKind> {
        let name = block
            .model
            .as_deref()
            .ok_or(BlockErrorKind::MissingReference)?;
        resolved.get(name).ok_or_else(|| {
            if failed_models.iter().any(|m| m == name) {
                BlockErrorKind::UnresolvedModel(name.to_string())
            } else {
                BlockErrorKind::UnknownModel(name.to_string())
            }
        })
    }

    fn emit_block(
        &self,
        output: &mut String,
        scanned: &ScannedFile,
        block: &AiBlock,
        model: &UnifiedModel,
    ) {
        let indent = &block.indent;

        if !self.delete_markers {
            output.push_str(&scanned.lines[block.start_line]);
        }
        output.push_str(&format!("{indent}# using: {{{}}}\n", model.name));
        for line in self.serializer.render_lines(model) {
            output.push_str(&format!("{indent}{line}\n"));
        }
        for comment in &block.comments {
            output.push_str(comment);
            output.push('\n');
        }
        if !self.delete_markers {
            output.push_str(&scanned.lines[block.end_line]);
        }
    }
}
