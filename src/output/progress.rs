use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Creates and manages progress indication for the three-phase report run
pub struct PhaseProgress {
    pb: ProgressBar,
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

impl PhaseProgress {
    /// Create a new phase progress tracker and start Phase 1
    pub fn start_phase_1() -> Self {
        Self {
            pb: spinner("Phase 1/3: Checking open pull requests for staleness...".to_string()),
        }
    }

    /// Finish Phase 1 and start Phase 2
    pub fn finish_phase_1_start_phase_2(self, stale_count: usize) -> Self {
        self.pb.finish_with_message(format!(
            "✓ Phase 1/3: Found {stale_count} stale community pull requests"
        ));

        Self {
            pb: spinner("Phase 2/3: Collecting completed pull requests and conversions...".to_string()),
        }
    }

    /// Finish Phase 2 and start Phase 3
    pub fn finish_phase_2_start_phase_3(self, member_count: usize) -> Self {
        self.pb.finish_with_message(format!(
            "✓ Phase 2/3: Recognized {member_count} contributing members"
        ));

        Self {
            pb: spinner("Phase 3/3: Assembling reports...".to_string()),
        }
    }

    /// Finish Phase 3 and complete all progress
    pub fn finish_phase_3(self) {
        self.pb
            .finish_with_message("✓ Phase 3/3: Reports assembled successfully");
    }
}
