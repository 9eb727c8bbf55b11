//! Anchor resolution: wiring floated components to their targets.

use crate::component::{AnchorPosition, Component};
use crate::context::CompileContext;
use serde_json::json;

/// Resolves anchor relationships across the built component sequence.
///
/// For every component requesting an anchor, the nearest following component
/// that accepts targets is claimed, falling back to a backwards scan. A
/// component that finds no target drops its anchor. `Auto` resolves against
/// the body orientation so floats sit opposite the text.
pub fn resolve_anchors(components: &mut [Component], ctx: &mut CompileContext) {
    for index in 0..components.len() {
        if components[index].anchor_position == AnchorPosition::None {
            continue;
        }

        let Some(target_index) = find_target(components, index) else {
            components[index].anchor_position = AnchorPosition::None;
            continue;
        };

        let position = resolved_position(components[index].anchor_position, ctx);
        let target_uid = components[target_index].uid();

        let anchored = &mut components[index];
        anchored.anchor_position = position;
        anchored.set_json(
            "anchor",
            json!({
                "targetComponentIdentifier": target_uid,
                "targetAnchorPosition": "center",
            }),
        );
        if anchored.caps.needs_layout_if_anchored {
            set_anchor_layout(anchored, position, ctx);
        }
    }
}

/// A target accepts an anchor while it can be a target and has not been
/// claimed by an earlier anchor (claiming assigns the uid).
fn accepts_anchor(component: &Component) -> bool {
    component.caps.can_be_anchor_target && component.maybe_uid().is_none()
}

fn find_target(components: &[Component], from: usize) -> Option<usize> {
    components
        .iter()
        .enumerate()
        .skip(from + 1)
        .find(|(_, candidate)| accepts_anchor(candidate))
        .map(|(index, _)| index)
        .or_else(|| {
            components[..from]
                .iter()
                .enumerate()
                .rev()
                .find(|(_, candidate)| accepts_anchor(candidate))
                .map(|(index, _)| index)
        })
}

fn resolved_position(position: AnchorPosition, ctx: &CompileContext) -> AnchorPosition {
    match position {
        AnchorPosition::Auto => {
            if ctx.theme.body_orientation == "left" {
                AnchorPosition::Right
            } else {
                AnchorPosition::Left
            }
        }
        other => other,
    }
}

/// Registers the narrow side layout for an anchored component and points its
/// `layout` property at it.
fn set_anchor_layout(component: &mut Component, position: AnchorPosition, ctx: &mut CompileContext) {
    let columns = ctx.theme.layout_columns;
    let span = (columns / 2).max(1);
    let (name, start) = match position {
        AnchorPosition::Right => ("anchor-layout-right", columns.saturating_sub(span)),
        _ => ("anchor-layout-left", 0),
    };
    let key = component.component_object_key(name);
    ctx.layouts.register(
        &key,
        json!({
            "columnStart": start,
            "columnSpan": span,
            "margin": { "top": 25, "bottom": 25 },
        }),
    );
    component.set_json("layout", json!(key));
}
