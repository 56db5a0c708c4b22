//! Human-readable rendering of projects and events.

use colored::Colorize;
use std::fmt::Write;
use vp_core::state::{gate, PipelineProject};
use vp_protocol::generation_models::GenerationStatus;
use vp_protocol::ipc::Event;
use vp_protocol::project_models::SnapshotSummary;
use vp_protocol::stage_models::PipelineStage;

pub fn describe_event(event: &Event) -> String {
    match event {
        Event::Updated => "Updated".green().to_string(),
        Event::SceneAdded { scene } => format!(
            "{} scene {} at position {}",
            "Added".green(),
            scene.id.bold(),
            scene.ordinal
        ),
        Event::ScenesChanged { scene_count } => {
            format!("{} storyboard has {scene_count} scene(s)", "Updated:".green())
        }
        Event::GenerationResultUpdated { scene_id, status } => {
            format!("Scene {} is now {}", scene_id.bold(), paint_status(*status))
        }
        Event::StepChanged { from, to } => {
            format!("{} {from} -> {}", "Stage:".green(), to.as_str().bold())
        }
        Event::AdvanceBlocked {
            target: Some(target),
            reason,
        } => format!("{} {target}: {reason}", "Cannot enter".yellow()),
        Event::AdvanceBlocked {
            target: None,
            reason,
        } => format!("{} {reason}", "Cannot advance:".yellow()),
        Event::ProjectReset => "Project reset".yellow().to_string(),
        Event::ProjectLoaded { project_id } => format!(
            "Loaded project {}",
            project_id.as_deref().unwrap_or("(unsaved)")
        ),
        Event::Rejected { reason } => format!("{} {reason}", "Rejected:".red()),
    }
}

fn paint_status(status: GenerationStatus) -> String {
    let text = status.as_str();
    match status {
        GenerationStatus::Pending => text.dimmed().to_string(),
        GenerationStatus::Processing => text.cyan().to_string(),
        GenerationStatus::Completed => text.green().to_string(),
        GenerationStatus::Failed => text.red().to_string(),
    }
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

pub fn render_project(project: &PipelineProject) -> String {
    let mut out = String::new();
    let step = project.current_step();
    let brief = project.brief();

    let _ = writeln!(
        out,
        "{} {} ({})",
        "Project".bold(),
        or_dash(project.project_id()),
        project.project_name()
    );
    let _ = writeln!(
        out,
        "Stage       {}/{} {}",
        step.index() + 1,
        PipelineStage::ALL.len(),
        step.label()
    );
    let _ = writeln!(out, "Brief       {}", or_dash(Some(brief.description.as_str())));
    let format_line = [
        brief.video_type.clone(),
        brief.platform.clone(),
        if brief.duration_secs > 0 {
            format!("{}s", brief.duration_secs)
        } else {
            String::new()
        },
        brief.aspect_ratio.clone(),
        brief.resolution.clone(),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(", ");
    if !format_line.is_empty() {
        let _ = writeln!(out, "Format      {format_line}");
    }
    let _ = writeln!(
        out,
        "Plan        {}",
        if project.decomposition_plan().is_some() {
            "recorded"
        } else {
            "-"
        }
    );
    let _ = writeln!(out, "Avatar      {}", or_dash(project.selected_avatar()));
    let _ = writeln!(out, "Voice       {}", or_dash(project.selected_voice()));
    let _ = writeln!(out, "Transition  {}", project.transition_type());
    let _ = writeln!(out, "Final video {}", or_dash(project.final_video_url()));

    let scenes = project.scenes();
    let ledger = project.generation_results();
    let _ = writeln!(out, "{} ({})", "Scenes".bold(), scenes.len());
    for scene in scenes {
        let status = ledger
            .get(&scene.id)
            .map(|r| paint_status(r.status))
            .unwrap_or_else(|| "-".to_string());
        let script = if scene.has_script() {
            scene.script.as_str()
        } else {
            "(no script)"
        };
        let _ = writeln!(
            out,
            "  {}. {} [{}] {}",
            scene.ordinal, scene.id, status, script
        );
    }

    let orphans = ledger.orphans(scenes);
    if !orphans.is_empty() {
        let ids: Vec<_> = orphans.iter().map(|r| r.scene_id.as_str()).collect();
        let _ = writeln!(
            out,
            "{} results for removed scenes: {}",
            "Note:".yellow(),
            ids.join(", ")
        );
    }
    out
}

pub fn render_gates(project: &PipelineProject) -> String {
    let current = project.current_step();
    let mut out = String::new();
    for (stage, blocker) in gate::evaluate_all(project) {
        let line = match (stage == current, blocker) {
            (true, _) => format!("{} {:<16}current", ">".bold(), stage.as_str()),
            (false, None) => format!("{} {}", "+".green(), stage.as_str()),
            (false, Some(reason)) => {
                format!("{} {:<16}{reason}", "x".red(), stage.as_str())
            }
        };
        let _ = writeln!(out, "{line}");
    }
    out
}

pub fn render_summaries(summaries: &[SnapshotSummary], current: Option<&str>) -> String {
    if summaries.is_empty() {
        return "No projects yet. Create one with `vpipe new <name>`.\n".to_string();
    }
    let mut out = String::new();
    for summary in summaries {
        let marker = if current == Some(summary.project_id.as_str()) {
            "*"
        } else {
            " "
        };
        let _ = writeln!(
            out,
            "{marker} {:<24} {:<16} {:>3} scene(s)  {}",
            summary.project_id,
            summary.current_step.as_str(),
            summary.scene_count,
            summary.project_name
        );
    }
    out
}
