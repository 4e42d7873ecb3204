use super::plan::show_route;
use super::Context;
use anyhow::{bail, Context as _, Result};
use starroute_routing::Route;

fn restored(ctx: &Context) -> Result<Route> {
    let mut route = ctx.session_route()?;
    if !route.is_set() {
        bail!("no route planned; run `starroute plan` first");
    }
    Ok(route)
}

pub fn handle_split(ctx: &Context, system: &str) -> Result<()> {
    let system = ctx.resolve(system)?;
    let mut route = restored(ctx)?;
    route.split_at(system).context("split failed")?;
    show_route(ctx, &mut route)
}

pub fn handle_remove(ctx: &Context, system: &str) -> Result<()> {
    let system = ctx.resolve(system)?;
    let mut route = restored(ctx)?;
    route.remove_waypoint(system).context("remove failed")?;
    show_route(ctx, &mut route)
}

pub fn handle_move(ctx: &Context, old: &str, new: &str) -> Result<()> {
    let old = ctx.resolve(old)?;
    let new = ctx.resolve(new)?;
    let mut route = restored(ctx)?;
    route.move_waypoint(old, new).context("move failed")?;
    show_route(ctx, &mut route)
}
