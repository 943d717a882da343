use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use lambdaswap::engine::progress::{BlockReport, Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Renders workflow progress events as a spinner or cycle bar on stderr.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
    component_names: Arc<Vec<String>>,
}

impl CliProgressHandler {
    pub fn new(component_names: Vec<String>) -> Self {
        let pb = ProgressBar::new(0)
            .with_style(Self::spinner_style())
            .with_message("Initializing...");
        pb.set_draw_target(ProgressDrawTarget::stderr());
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
            component_names: Arc::new(component_names),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();
        let names = self.component_names.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    pb_guard.reset();
                    pb_guard.set_length(0);
                    pb_guard.set_style(Self::spinner_style());
                    pb_guard.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    pb_guard.set_message(name);
                }
                Progress::PhaseFinish => {
                    pb_guard.disable_steady_tick();
                    pb_guard.finish_with_message("✓ Done");
                }
                Progress::TaskStart { total_steps } => {
                    pb_guard.disable_steady_tick();
                    pb_guard.reset();
                    pb_guard.set_length(total_steps);
                    pb_guard.set_position(0);
                    pb_guard.set_style(Self::bar_style());
                }
                Progress::TaskIncrement => pb_guard.inc(1),
                Progress::TaskFinish => {
                    let length = pb_guard.length().unwrap_or(0);
                    if pb_guard.position() < length {
                        pb_guard.set_position(length);
                    }
                    pb_guard.finish();
                }
                Progress::Block(report) => {
                    pb_guard.println(format_block(&report, &names));
                }
                Progress::Message(msg) => {
                    if pb_guard.is_finished() {
                        pb_guard.set_message(msg);
                    } else {
                        pb_guard.println(format!("  {msg}"));
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .expect("spinner template is valid")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<16} [{bar:40.cyan/blue}] {pos}/{len} cycles ({eta})")
            .expect("bar template is valid")
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("##-")
    }
}

/// One line per component and block, e.g.
/// `  [cycle 1000] methane: N = 12, bin 7, acc ins/del/lambda 0.31/0.29/0.64`.
pub fn format_block(report: &BlockReport, names: &[String]) -> String {
    let name = names
        .get(report.component)
        .map(String::as_str)
        .unwrap_or("?");
    let [insertion, deletion, lambda] = report.acceptance;
    format!(
        "  [cycle {}] {}: N = {}, bin {}, acc ins/del/lambda {:.2}/{:.2}/{:.2}",
        report.cycle, name, report.integer_molecules, report.lambda_bin, insertion, deletion, lambda
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn handler() -> CliProgressHandler {
        CliProgressHandler::new(vec!["methane".to_string()])
    }

    #[test]
    fn handler_initializes_in_a_clean_state() {
        let handler = handler();
        let pb = handler.pb.lock().unwrap();
        assert_eq!(pb.length(), Some(0));
        assert!(pb.is_finished());
    }

    #[test]
    fn callback_tracks_phases_and_cycles() {
        let handler = handler();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart { name: "Production" });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.message(), "Production");
            assert!(!pb.is_finished());
        }

        callback(Progress::TaskStart { total_steps: 50 });
        callback(Progress::TaskIncrement);
        callback(Progress::TaskIncrement);
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.length(), Some(50));
            assert_eq!(pb.position(), 2);
        }

        callback(Progress::TaskFinish);
        {
            let pb = handler.pb.lock().unwrap();
            assert!(pb.is_finished());
            assert_eq!(pb.position(), 50);
        }

        callback(Progress::PhaseFinish);
        assert_eq!(handler.pb.lock().unwrap().message(), "✓ Done");
    }

    #[test]
    fn block_reports_do_not_disturb_the_bar() {
        let handler = handler();
        let callback = handler.get_callback();

        callback(Progress::TaskStart { total_steps: 10 });
        callback(Progress::TaskIncrement);
        callback(Progress::Block(BlockReport {
            cycle: 1,
            component: 0,
            integer_molecules: 3,
            lambda_bin: 4,
            acceptance: [0.5, 0.25, 1.0],
        }));

        let pb = handler.pb.lock().unwrap();
        assert_eq!(pb.position(), 1);
        assert_eq!(pb.length(), Some(10));
    }

    #[test]
    fn format_block_names_the_component() {
        let report = BlockReport {
            cycle: 1000,
            component: 0,
            integer_molecules: 12,
            lambda_bin: 7,
            acceptance: [0.314, 0.29, 0.6449],
        };
        assert_eq!(
            format_block(&report, &["methane".to_string()]),
            "  [cycle 1000] methane: N = 12, bin 7, acc ins/del/lambda 0.31/0.29/0.64"
        );
        assert!(format_block(&BlockReport { component: 5, ..report }, &[]).contains("] ?:"));
    }

    #[test]
    fn callback_is_thread_safe() {
        let handler = handler();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart { name: "Equilibration" });
            callback(Progress::TaskIncrement);
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        let pb = handler.pb.lock().unwrap();
        assert!(pb.is_finished());
        assert_eq!(pb.message(), "✓ Done");
    }
}
