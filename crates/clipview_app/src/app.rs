use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clipview_core::{update, AppState, Msg, SessionPhase};
use clipview_engine::{EngineConfig, EngineHandle};
use clipview_logging::{clip_info, clip_warn};

use crate::config::AppConfig;
use crate::effects::EffectRunner;
use crate::render::render;

const EVENT_WAIT: Duration = Duration::from_millis(100);

pub fn run_app(config: AppConfig) -> anyhow::Result<()> {
    let engine = EngineHandle::new(EngineConfig::new(config.server.clone()))
        .context("failed to start engine")?;
    clip_info!(
        "clipview started server={} platform={} width={}",
        config.server,
        config.platform,
        config.surface_width
    );

    let mut shell = Shell {
        state: AppState::with_surface_width(config.surface_width),
        runner: EffectRunner::new(engine),
        out: io::stdout(),
    };
    let resize_rx = spawn_width_reader();

    shell.dispatch(Msg::Submitted {
        url: config.video_url,
        platform: config.platform,
    })?;

    while !shell.state.is_settled() {
        while let Ok(width) = resize_rx.try_recv() {
            if shell.runner.listeners().is_listening() {
                shell.dispatch(Msg::SurfaceResized { width })?;
            }
        }
        if let Some(msg) = shell.runner.next_msg(EVENT_WAIT) {
            shell.dispatch(msg)?;
        }
    }

    clip_info!("clipview done phase={:?}", shell.state.phase());
    match shell.state.phase() {
        SessionPhase::Finished => Ok(()),
        phase => anyhow::bail!("job ended in {phase:?}"),
    }
}

struct Shell {
    state: AppState,
    runner: EffectRunner,
    out: io::Stdout,
}

impl Shell {
    fn dispatch(&mut self, msg: Msg) -> anyhow::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);

        if !self.state.consume_dirty() {
            return Ok(());
        }
        let view = self.state.view();
        let mut out = self.out.lock();
        for line in render(&view) {
            writeln!(out, "{line}")?;
        }
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}

/// Widths typed on stdin, one per line, act as viewport resize events.
fn spawn_width_reader() -> mpsc::Receiver<f64> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match line.trim().parse::<f64>() {
                Ok(width) if width.is_finite() && width > 0.0 => {
                    if tx.send(width).is_err() {
                        break;
                    }
                }
                _ if line.trim().is_empty() => {}
                _ => clip_warn!("Ignoring resize input {:?}", line),
            }
        }
    });
    rx
}
