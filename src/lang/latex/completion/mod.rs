use crate::{catalog::Catalog, lang::Completions, registry::Registry};

/// Everything a completion request can see. All borrowed, nothing outlives the request.
#[derive(Debug, Clone, Copy)]
pub struct CompletionCtx<'a> {
    /// Full text of the active document.
    pub text: &'a str,
    /// Byte offset of the cursor in `text`.
    pub offset: usize,
    /// Package metadata of the open documents, `None` when the session has none.
    pub metadata: Option<&'a Registry>,
    pub catalog: &'a Catalog,
}

impl<'a> CompletionCtx<'a> {
    /// 1-based number of the line holding the cursor.
    pub fn line_number(&self) -> usize {
        let end = self.offset.min(self.text.len());
        self.text.as_bytes()[..end]
            .iter()
            .filter(|b| **b == b'\n')
            .count()
            + 1
    }
}

pub trait CompletionProvider<Ctx> {
    fn find_completions(&self, ctx: &Ctx, completions: &mut Completions);
}

mod packages;
pub use packages::*;
