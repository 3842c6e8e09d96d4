// src/cli/progress.rs — Terminal progress renderer for studio runs

use crate::studio::StudioEvent;

/// One status line per event.
pub fn format_event(event: &StudioEvent) -> String {
    match event {
        StudioEvent::Generating { style } => {
            format!("[generate] {} prompt...", style)
        }
        StudioEvent::Testing {
            style,
            iteration,
            iterations,
        } => format!("[test {}/{}] {} prompt...", iteration, iterations, style),
        StudioEvent::Scored { style, score } => {
            format!("[score] {:<10} {:>3}/100", style.name(), score)
        }
        StudioEvent::Refining { style, score } => {
            format!("[refine] best: {} ({}/100)", style, score)
        }
        StudioEvent::Complete { best_score } => {
            format!("[done] highest score {}/100", best_score)
        }
    }
}

/// Build a progress callback that writes to stderr, keeping stdout for results.
pub fn terminal_progress() -> impl Fn(StudioEvent) + Send + Sync + 'static {
    move |event| eprintln!("{}", format_event(&event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::studio::PromptStyle;

    #[test]
    fn test_generating_format() {
        let msg = format_event(&StudioEvent::Generating {
            style: PromptStyle::Concise,
        });
        assert_eq!(msg, "[generate] Concise prompt...");
    }

    #[test]
    fn test_testing_format() {
        let msg = format_event(&StudioEvent::Testing {
            style: PromptStyle::Detailed,
            iteration: 2,
            iterations: 3,
        });
        assert_eq!(msg, "[test 2/3] Detailed prompt...");
    }

    #[test]
    fn test_scored_format_aligned() {
        let msg = format_event(&StudioEvent::Scored {
            style: PromptStyle::Creative,
            score: 7,
        });
        assert_eq!(msg, "[score] Creative     7/100");
    }

    #[test]
    fn test_refining_and_complete_format() {
        assert_eq!(
            format_event(&StudioEvent::Refining {
                style: PromptStyle::Structured,
                score: 90,
            }),
            "[refine] best: Structured (90/100)"
        );
        assert_eq!(
            format_event(&StudioEvent::Complete { best_score: 90 }),
            "[done] highest score 90/100"
        );
    }
}
