use console::Style;
use serde::Serialize;
use starroute_graph::{Metric, StarGraph, SystemId};
use starroute_routing::RouteStep;

pub fn print_header(title: &str) {
    println!("\n{}", Style::new().bold().cyan().apply_to(title));
    println!("{}", Style::new().dim().apply_to("─".repeat(title.chars().count())));
}

pub fn print_success(msg: &str) {
    println!("{} {}", Style::new().green().bold().apply_to("OK:"), msg);
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", Style::new().yellow().bold().apply_to("WARNING:"), msg);
}

pub fn print_key_value(key: &str, value: &str) {
    println!(
        "{}: {}",
        Style::new().dim().apply_to(key),
        Style::new().bold().apply_to(value)
    );
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepView {
    pub index: usize,
    pub id: SystemId,
    pub name: String,
    pub weight: f64,
    pub waypoint: bool,
    /// Type code of the jump point taken to reach this system.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jump: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteView {
    pub metric: Metric,
    pub steps: Vec<StepView>,
    pub total_weight: f64,
}

impl RouteView {
    /// Flatten concatenated segment paths into one list. A repeated system
    /// marks a segment boundary; weights are made cumulative across
    /// segments.
    pub fn from_steps(graph: &StarGraph, metric: Metric, steps: &[RouteStep]) -> Self {
        let mut views: Vec<StepView> = Vec::with_capacity(steps.len());
        let mut offset = 0.0;
        let mut previous: Option<RouteStep> = None;

        for step in steps {
            if let Some(prev) = previous {
                if prev.system == step.system {
                    offset += prev.cumulative;
                    if let Some(last) = views.last_mut() {
                        last.waypoint = true;
                    }
                    previous = Some(*step);
                    continue;
                }
            }
            views.push(StepView {
                index: views.len() + 1,
                id: step.system,
                name: graph
                    .system(step.system)
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| step.system.to_string()),
                weight: offset + step.cumulative,
                waypoint: previous.is_none(),
                jump: previous
                    .and_then(|prev| graph.jump_point(prev.system, step.system))
                    .map(|jump| jump.kind.code()),
            });
            previous = Some(*step);
        }
        if let Some(last) = views.last_mut() {
            last.waypoint = true;
        }

        let total_weight = views.last().map(|v| v.weight).unwrap_or(0.0);
        Self {
            metric,
            steps: views,
            total_weight,
        }
    }
}

pub fn print_route(view: &RouteView, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }

    let marker = Style::new().bold().green();
    let dim = Style::new().dim();
    println!(
        "{}",
        dim.apply_to(format!(
            "{:>4}  {:<28} {:>12}  {}",
            "#",
            "System",
            view.metric.to_string(),
            "Jump"
        ))
    );
    for step in &view.steps {
        let name = format!("{:<28}", step.name);
        let name = if step.waypoint {
            marker.apply_to(name).to_string()
        } else {
            name
        };
        println!(
            "{:>4}  {} {:>12.2}  {}",
            step.index,
            name,
            step.weight,
            step.jump.unwrap_or("")
        );
    }
    print_key_value("Jumps", &view.steps.len().saturating_sub(1).to_string());
    print_key_value("Total", &format!("{:.2}", view.total_weight));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use starroute_graph::{JumpKind, System};

    fn step(id: u32, cumulative: f64) -> RouteStep {
        RouteStep {
            system: SystemId(id),
            cumulative,
        }
    }

    #[test]
    fn boundaries_collapse_and_weights_accumulate() {
        let mut builder = StarGraph::builder();
        for id in 1..=4 {
            builder
                .add_system(System::new(id, format!("S{id}"), [id as f64, 0.0, 0.0]))
                .unwrap();
        }
        builder
            .connect_both(SystemId(1), SystemId(2), JumpKind::Normal)
            .unwrap()
            .connect(SystemId(2), SystemId(3), JumpKind::Unconfirmed)
            .unwrap();
        let graph = builder.build();

        let steps = [step(1, 0.0), step(2, 1.0), step(2, 0.0), step(3, 2.0), step(4, 3.0)];
        let view = RouteView::from_steps(&graph, Metric::Distance, &steps);

        let summary: Vec<(usize, u32, f64, bool)> = view
            .steps
            .iter()
            .map(|s| (s.index, s.id.0, s.weight, s.waypoint))
            .collect();
        assert_eq!(
            summary,
            vec![
                (1, 1, 0.0, true),
                (2, 2, 1.0, true),
                (3, 3, 3.0, false),
                (4, 4, 4.0, true),
            ]
        );
        assert_eq!(view.total_weight, 4.0);

        let jumps: Vec<Option<&str>> = view.steps.iter().map(|s| s.jump).collect();
        assert_eq!(jumps, vec![None, Some("NORMAL"), Some("UNCONF"), None]);
        let json = serde_json::to_value(&view.steps[1]).unwrap();
        assert_eq!(json["jump"], "NORMAL");
        assert!(serde_json::to_value(&view.steps[0]).unwrap().get("jump").is_none());
    }

    #[test]
    fn empty_route_has_no_steps() {
        let graph = StarGraph::builder().build();
        let view = RouteView::from_steps(&graph, Metric::Time, &[]);
        assert!(view.steps.is_empty());
        assert_eq!(view.total_weight, 0.0);
    }
}
