//! Background render worker: redraws on a fixed tick whenever the session is
//! dirty.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Sender, bounded, select, tick};
use tracing::{debug, warn};

use crate::render::frame::draw_frame;
use crate::render::surface::Renderer;
use crate::session::SessionHandle;

/// Handle to the running render thread. Dropping it stops and joins the
/// thread.
pub struct RenderTask {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<Box<dyn Renderer>>>,
}

impl RenderTask {
    /// Spawn the render loop. Each `cadence` tick checks the dirty flag; a
    /// dirty session is drawn with its lock held for the whole pass.
    pub fn spawn(
        session: SessionHandle,
        mut renderer: Box<dyn Renderer>,
        cadence: Duration,
        page_size: usize,
    ) -> std::io::Result<Self> {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let handle = thread::Builder::new()
            .name("gallery-render".into())
            .spawn(move || {
                let ticker = tick(cadence);
                let mut frames: u64 = 0;
                loop {
                    select! {
                        recv(stop_rx) -> _ => break,
                        recv(ticker) -> _ => {
                            if session.render_if_dirty(|s| draw_frame(s, renderer.as_mut(), page_size)) {
                                frames += 1;
                                debug!(frames, "rendered frame");
                            }
                        }
                    }
                }
                debug!(frames, "render task stopped");
                renderer
            })?;
        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Stop the loop and hand back the renderer. Any pass in progress
    /// completes first.
    pub fn stop(mut self) -> Option<Box<dyn Renderer>> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Option<Box<dyn Renderer>> {
        // Dropping the sender disconnects the channel, which also ends the loop.
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.try_send(());
        }
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(renderer) => Some(renderer),
            Err(_) => {
                warn!("render task panicked");
                None
            }
        }
    }
}

impl Drop for RenderTask {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}
