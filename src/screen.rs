//! Screen lifecycle: the session and its render task are created on enter and
//! torn down together on exit.

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::codec::ImageCodec;
use crate::config::GalleryConfig;
use crate::controller::{Controller, GoHome};
use crate::input::{InputEvent, InputSource};
use crate::pipeline::remove_stale_temp;
use crate::render::surface::Renderer;
use crate::render::task::RenderTask;
use crate::session::{Session, SessionHandle};
use crate::settings::IntervalCursor;
use crate::storage::Storage;

pub struct GalleryScreen {
    controller: Controller,
    render_task: Option<RenderTask>,
    storage: Arc<dyn Storage>,
    temp_path: String,
}

impl GalleryScreen {
    /// Build a fresh session at `/`, list it, and start rendering.
    pub fn enter(
        config: &GalleryConfig,
        storage: Arc<dyn Storage>,
        codec: Arc<dyn ImageCodec>,
        renderer: Box<dyn Renderer>,
        on_go_home: GoHome,
    ) -> std::io::Result<Self> {
        info!(root = %config.storage_root.display(), "entering image gallery");
        let session = SessionHandle::new(Session::new(IntervalCursor::new(
            config.default_interval_index,
        )));
        let controller = Controller::new(
            config,
            session.clone(),
            storage.clone(),
            codec,
            on_go_home,
        );
        controller.reload_entries();

        let render_task = RenderTask::spawn(session, renderer, config.render_tick, config.page_size)?;
        Ok(Self {
            controller,
            render_task: Some(render_task),
            storage,
            temp_path: config.temp_image_path.clone(),
        })
    }

    pub fn session(&self) -> &SessionHandle {
        self.controller.session()
    }

    pub fn poll(&mut self, input: &dyn InputSource, now: Instant) {
        self.controller.poll(input, now);
    }

    pub fn handle(&mut self, event: InputEvent, now: Instant) {
        self.controller.handle(event, now);
    }

    pub fn tick(&mut self, now: Instant) {
        self.controller.tick(now);
    }

    /// Stop rendering and remove any leftover temporary bitmap. Returns the
    /// renderer handed to [`GalleryScreen::enter`].
    pub fn exit(mut self) -> Option<Box<dyn Renderer>> {
        self.teardown()
    }

    fn teardown(&mut self) -> Option<Box<dyn Renderer>> {
        let renderer = self.render_task.take()?.stop();
        remove_stale_temp(self.storage.as_ref(), &self.temp_path);
        info!("left image gallery");
        renderer
    }
}

impl Drop for GalleryScreen {
    fn drop(&mut self) {
        let _ = self.teardown();
    }
}
