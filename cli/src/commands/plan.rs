use super::ui::{print_header, print_route, print_success, print_warning, RouteView};
use super::Context;
use anyhow::{Context as _, Result};
use starroute_routing::Route;

pub fn handle_plan(ctx: &Context, start: &str, waypoints: &[String]) -> Result<()> {
    let start = ctx.resolve(start)?;
    let waypoints = waypoints
        .iter()
        .map(|w| ctx.resolve(w))
        .collect::<Result<Vec<_>>>()?;

    let mut route = ctx.session_route()?;
    route
        .set_route(Some(start), waypoints)
        .context("route not planned")?;
    show_route(ctx, &mut route)
}

pub fn handle_show(ctx: &Context) -> Result<()> {
    let mut route = ctx.session_route()?;
    if let Some(err) = route.last_error() {
        print_warning(&format!("stored route cannot be followed: {err}"));
    }
    show_route(ctx, &mut route)
}

pub fn handle_clear(ctx: &Context) -> Result<()> {
    let mut route = ctx.session_route()?;
    route.clear();
    if ctx.json {
        println!("{}", serde_json::json!({ "cleared": true }));
    } else {
        print_success("route cleared");
    }
    Ok(())
}

pub(super) fn show_route(ctx: &Context, route: &mut Route) -> Result<()> {
    if !route.is_set() {
        if ctx.json {
            println!("{}", serde_json::json!({ "route": null }));
        } else {
            println!("No route planned.");
        }
        return Ok(());
    }

    let steps = route.current_route();
    let view = RouteView::from_steps(&ctx.graph, ctx.options.metric, &steps);
    if !ctx.json {
        print_header(&route.to_string());
    }
    print_route(&view, ctx.json)
}
