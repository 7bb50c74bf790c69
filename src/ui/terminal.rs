use std::io::{self, Write};

use crate::scan::{Polarity, RenderPlan, ResultView, SubmitAffordance, VerdictView};

pub const METER_WIDTH: usize = 30;

/// Number of filled cells for a percentage, clamped to the bar.
pub fn meter_cells(percent: f64, width: usize) -> usize {
    let filled = (percent.clamp(0.0, 100.0) / 100.0 * width as f64).round();
    filled as usize
}

pub fn draw_meter(percent: f64) -> String {
    let filled = meter_cells(percent, METER_WIDTH);
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(METER_WIDTH - filled)
    )
}

fn icon(polarity: Polarity) -> &'static str {
    match polarity {
        Polarity::Alert => "[!]",
        Polarity::Check => "[✓]",
    }
}

pub fn render_submit(submit: &SubmitAffordance) -> String {
    let hint = if submit.busy {
        "waiting for the classifier"
    } else if submit.enabled {
        "ready, type :scan"
    } else {
        "add some text first"
    };
    format!("< {} > {hint}", submit.caption)
}

fn render_verdict(view: &VerdictView) -> Vec<String> {
    let heading = "Confidence Score";
    let pad = (METER_WIDTH + 2).saturating_sub(heading.len() + view.confidence_text.len());
    vec![
        format!("{} {}", icon(view.polarity), view.badge),
        format!("{heading}{}{}", " ".repeat(pad), view.confidence_text),
        draw_meter(view.meter_percent),
        view.explanation.to_string(),
    ]
}

pub fn render_result(view: &ResultView) -> Vec<String> {
    match view {
        ResultView::Empty => Vec::new(),
        ResultView::Verdict(verdict) => render_verdict(verdict),
        ResultView::Error { message, polarity } => {
            vec![format!("{} {message}", icon(*polarity))]
        }
    }
}

pub fn render_plan(plan: &RenderPlan) -> Vec<String> {
    let mut lines = render_result(&plan.result);
    lines.push(render_submit(&plan.submit));
    lines
}

pub fn write_plan<W: Write>(out: &mut W, plan: &RenderPlan) -> io::Result<()> {
    for line in render_plan(plan) {
        writeln!(out, "{line}")?;
    }
    out.flush()
}
