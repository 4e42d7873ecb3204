use super::ui::{print_header, print_route, RouteView};
use super::Context;
use anyhow::{bail, Result};
use starroute_routing::Segment;
use std::sync::Arc;

pub fn handle_path(ctx: &Context, from: &str, to: &str) -> Result<()> {
    let from = ctx.resolve(from)?;
    let to = ctx.resolve(to)?;

    let mut segment = Segment::with_options(Arc::clone(&ctx.graph), from, to, ctx.options)?;
    segment.build(ctx.options);
    let steps = segment.route()?;
    if steps.len() <= 1 {
        bail!("No route from {} available", segment);
    }

    let view = RouteView::from_steps(&ctx.graph, ctx.options.metric, &steps);
    if !ctx.json {
        print_header(&segment.to_string());
    }
    print_route(&view, ctx.json)
}
