use std::collections::HashSet;
use std::time::Instant;

use dt_core::{LineIndex, Span};
use dt_parser::{attachment_start, classify, display_name, extract, preorder, target_for, SyntaxNode};

use crate::config::SynthConfig;
use crate::error::SynthError;
use crate::merge::{find_existing, plan, shares_line};
use crate::render::render;
use crate::report::{SkipReason, SweepOutcome, SweepReport};

/// Document every eligible node under `root` in document order.
///
/// Only a node's own classification counts; nothing resolves upward here.
/// Targets sharing an anchor are visited once. With `bounds`, a target is
/// included when its first line starts inside them. Any failure aborts the
/// whole batch.
pub fn sweep<'t, N: SyntaxNode<'t>>(
    root: N,
    index: &LineIndex<'_>,
    bounds: Option<Span>,
    overwrite_existing: bool,
    config: &SynthConfig,
) -> Result<SweepOutcome, SynthError> {
    let started = Instant::now();
    let mut report = SweepReport::default();
    let mut edits = Vec::new();
    let mut anchors = HashSet::new();

    for node in preorder(root) {
        let shape = classify(node);
        if !shape.is_supported() {
            continue;
        }
        let target = target_for(node, shape);
        if !anchors.insert(target.anchor.id()) {
            continue;
        }
        report.visited += 1;

        let start = attachment_start(target.anchor).start_position();
        if bounds.is_some_and(|b| !b.contains(start)) {
            report.skip(SkipReason::OutsideBounds);
            continue;
        }
        if shares_line(target.anchor, index) {
            tracing::debug!(node = ?target.node, "skipping node that shares its line");
            report.skip(SkipReason::SharedLine);
            continue;
        }
        if !overwrite_existing && find_existing(target.anchor, index).is_some() {
            report.skip(SkipReason::AlreadyDocumented);
            continue;
        }

        let desc = extract(target.node, shape);
        let block = render(
            &desc,
            display_name(target.node),
            index.indentation(start.line),
            config,
        );
        let planned = plan(&target, &desc, &block, index)?;
        if planned.is_empty() {
            report.up_to_date += 1;
        } else {
            report.documented += 1;
            edits.extend(planned);
        }
    }

    report.duration = started.elapsed();
    Ok(SweepOutcome { edits, report })
}
