//! Controller del tooltip del timeline
//!
//! Máquina de estados `Hidden -> Showing(trip, x, y) -> Hidden` con un
//! periodo de gracia antes de ocultar, para que el puntero pueda pasar de la
//! barra al tooltip sin parpadeo. El temporizador de ocultado es una tarea
//! tokio cancelable; nunca hay más de una armada.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::TooltipConfig;
use crate::models::trip::Trip;

/// Tamaño del viewport en píxeles
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Viaje mostrado y coordenadas del puntero capturadas al entrar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipAnchor {
    pub trip: Trip,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub enum TooltipState {
    #[default]
    Hidden,
    Showing(TooltipAnchor),
}

impl TooltipState {
    pub fn anchor(&self) -> Option<&TooltipAnchor> {
        match self {
            TooltipState::Hidden => None,
            TooltipState::Showing(anchor) => Some(anchor),
        }
    }
}

/// Posición final del tooltip en el viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TooltipPlacement {
    pub left: f64,
    pub top: f64,
    /// Se movió a la izquierda del puntero
    pub flipped: bool,
    /// Se subió para no salir por abajo
    pub clamped: bool,
}

/// Coloca el tooltip junto al puntero sin salir del viewport
pub fn place_tooltip(x: f64, y: f64, viewport: Viewport, config: &TooltipConfig) -> TooltipPlacement {
    let mut left = x + config.offset_px;
    let flipped = left + config.width_px > viewport.width;
    if flipped {
        left = x - config.offset_px - config.width_px;
    }

    let mut top = y + config.offset_px;
    let clamped = top + config.height_px > viewport.height;
    if clamped {
        top = viewport.height - config.height_px;
    }

    TooltipPlacement {
        left: left.max(0.0),
        top: top.max(0.0),
        flipped,
        clamped,
    }
}

/// Ocultado diferido; abortar una tarea ya terminada no hace nada
struct HideTimer {
    handle: JoinHandle<()>,
}

impl HideTimer {
    fn cancel(self) {
        self.handle.abort();
    }
}

struct TooltipShared {
    pending_hide: Option<HideTimer>,
    /// Cambia en cada armado/cancelación; un temporizador viejo no oculta nada
    generation: u64,
    state_tx: watch::Sender<TooltipState>,
}

impl TooltipShared {
    fn cancel_hide(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(timer) = self.pending_hide.take() {
            timer.cancel();
        }
    }

    fn is_showing(&self) -> bool {
        matches!(*self.state_tx.borrow(), TooltipState::Showing(_))
    }
}

fn lock(shared: &Mutex<TooltipShared>) -> MutexGuard<'_, TooltipShared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Controller del tooltip, una instancia por timeline
pub struct TooltipController {
    shared: Arc<Mutex<TooltipShared>>,
    state_rx: watch::Receiver<TooltipState>,
    config: TooltipConfig,
}

impl TooltipController {
    pub fn new(config: TooltipConfig) -> Self {
        let (state_tx, state_rx) = watch::channel(TooltipState::Hidden);

        Self {
            shared: Arc::new(Mutex::new(TooltipShared {
                pending_hide: None,
                generation: 0,
                state_tx,
            })),
            state_rx,
            config,
        }
    }

    pub fn state(&self) -> TooltipState {
        self.state_rx.borrow().clone()
    }

    /// Receptor para que la capa de render reaccione a cambios
    pub fn subscribe(&self) -> watch::Receiver<TooltipState> {
        self.state_rx.clone()
    }

    pub fn has_pending_hide(&self) -> bool {
        lock(&self.shared).pending_hide.is_some()
    }

    /// El puntero entra en una barra del timeline
    pub fn pointer_enter_bar(&self, trip: &Trip, x: f64, y: f64) {
        let mut shared = lock(&self.shared);
        shared.cancel_hide();

        let same_trip = matches!(
            &*shared.state_tx.borrow(),
            TooltipState::Showing(anchor) if anchor.trip.id == trip.id
        );
        if same_trip {
            return;
        }

        log::debug!("🛈 Tooltip para viaje {} en ({}, {})", trip.id, x, y);
        shared.state_tx.send_replace(TooltipState::Showing(TooltipAnchor {
            trip: trip.clone(),
            x,
            y,
        }));
    }

    /// El puntero entra en el propio tooltip: se mantiene visible
    pub fn pointer_enter_tooltip(&self) {
        lock(&self.shared).cancel_hide();
    }

    pub fn pointer_leave_bar(&self) {
        self.schedule_hide();
    }

    pub fn pointer_leave_tooltip(&self) {
        self.schedule_hide();
    }

    /// Oculta sin periodo de gracia
    pub fn hide_now(&self) {
        let mut shared = lock(&self.shared);
        shared.cancel_hide();
        shared.state_tx.send_replace(TooltipState::Hidden);
    }

    /// Posición del tooltip visible, `None` si está oculto
    pub fn placement(&self, viewport: Viewport) -> Option<TooltipPlacement> {
        self.state()
            .anchor()
            .map(|anchor| place_tooltip(anchor.x, anchor.y, viewport, &self.config))
    }

    fn schedule_hide(&self) {
        let mut shared = lock(&self.shared);
        shared.cancel_hide();

        if !shared.is_showing() {
            return;
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                log::warn!("⚠️ Sin runtime tokio, el tooltip se oculta de inmediato");
                shared.state_tx.send_replace(TooltipState::Hidden);
                return;
            }
        };

        let generation = shared.generation;
        let delay = Duration::from_millis(self.config.hide_delay_ms);
        let weak: Weak<Mutex<TooltipShared>> = Arc::downgrade(&self.shared);

        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            let Some(shared) = weak.upgrade() else {
                return;
            };
            let mut shared = lock(&shared);
            if shared.generation != generation {
                return;
            }

            shared.pending_hide = None;
            shared.state_tx.send_replace(TooltipState::Hidden);
            log::debug!("🛈 Tooltip oculto tras {:?}", delay);
        });

        shared.pending_hide = Some(HideTimer { handle });
    }
}

impl Drop for TooltipController {
    fn drop(&mut self) {
        lock(&self.shared).cancel_hide();
    }
}
