//! Win celebration: a one-shot confetti burst drawn on a full-window canvas.
//!
//! Particle motion is frame based (one step per animation frame) with velocity
//! decay and constant gravity. The canvas sits above the page with
//! `pointer-events:none` and is cleared once every particle has expired.

use std::cell::RefCell;
use std::f64::consts::PI;

use rand::Rng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, window};

pub const PARTICLE_COUNT: usize = 180;
pub const SPREAD_DEG: f64 = 70.0;
/// Burst origin as a fraction of the viewport height.
pub const ORIGIN_Y: f64 = 0.4;

const START_VELOCITY: f64 = 45.0;
const DECAY: f64 = 0.9;
const GRAVITY: f64 = 3.0;
const TICKS: u32 = 200;
const COLORS: [&str; 7] = [
    "#26ccff", "#a25afd", "#ff5e7e", "#88ff5a", "#fcff42", "#ffa62d", "#ff36ff",
];

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    /// Heading in canvas coordinates (y grows downward).
    pub angle: f64,
    pub velocity: f64,
    pub tick: u32,
    pub wobble: f64,
    pub color: &'static str,
}

impl Particle {
    pub fn step(&mut self) {
        self.x += self.angle.cos() * self.velocity;
        self.y += self.angle.sin() * self.velocity + GRAVITY;
        self.velocity *= DECAY;
        self.wobble += 0.1;
        self.tick += 1;
    }

    pub fn alive(&self) -> bool {
        self.tick < TICKS
    }

    fn opacity(&self) -> f64 {
        1.0 - self.tick as f64 / TICKS as f64
    }
}

/// Launches `count` particles upward from `(x, y)` within `spread_deg`.
pub fn spawn(rng: &mut impl Rng, count: usize, x: f64, y: f64, spread_deg: f64) -> Vec<Particle> {
    let up = PI / 2.0;
    let spread = spread_deg.to_radians();
    (0..count)
        .map(|_| Particle {
            x,
            y,
            angle: -up + (0.5 * spread - rng.gen_range(0.0..1.0) * spread),
            velocity: START_VELOCITY * 0.5 + rng.gen_range(0.0..1.0) * START_VELOCITY,
            tick: 0,
            wobble: rng.gen_range(0.0..10.0),
            color: COLORS[rng.gen_range(0..COLORS.len())],
        })
        .collect()
}

struct Burst {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    particles: Vec<Particle>,
    running: bool,
}

thread_local! {
    static BURST: RefCell<Option<Burst>> = const { RefCell::new(None) };
    static FRAME: RefCell<Option<Closure<dyn FnMut(f64)>>> = const { RefCell::new(None) };
}

fn viewport() -> (f64, f64) {
    let w = window();
    let width = w
        .as_ref()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0);
    let height = w
        .as_ref()
        .and_then(|w| w.inner_height().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(600.0);
    (width, height)
}

fn ensure_canvas() -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
    let doc = window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id("ng-confetti") {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id("ng-confetti");
        c.set_attribute(
            "style",
            "position:fixed; left:0; top:0; width:100%; height:100%; pointer-events:none; z-index:100;",
        )?;
        doc.body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&c)?;
        c
    };
    let (width, height) = viewport();
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;
    Ok((canvas, ctx))
}

/// Fires a burst. A burst already in flight gets the new particles added.
pub fn celebrate() -> Result<(), JsValue> {
    let (canvas, ctx) = ensure_canvas()?;
    let origin_x = canvas.width() as f64 * 0.5;
    let origin_y = canvas.height() as f64 * ORIGIN_Y;
    let fresh = spawn(
        &mut rand::thread_rng(),
        PARTICLE_COUNT,
        origin_x,
        origin_y,
        SPREAD_DEG,
    );

    let start_loop = BURST.with(|cell| {
        let mut slot = cell.borrow_mut();
        match slot.as_mut() {
            Some(burst) => {
                burst.particles.extend(fresh);
                let idle = !burst.running;
                burst.running = true;
                idle
            }
            None => {
                *slot = Some(Burst {
                    canvas,
                    ctx,
                    particles: fresh,
                    running: true,
                });
                true
            }
        }
    });
    if start_loop {
        request_frame();
    }
    Ok(())
}

fn request_frame() {
    FRAME.with(|f| {
        if f.borrow().is_none() {
            *f.borrow_mut() = Some(Closure::wrap(Box::new(|_ts: f64| {
                let keep_going = BURST.with(|cell| match cell.borrow_mut().as_mut() {
                    Some(burst) => tick(burst),
                    None => false,
                });
                if keep_going {
                    request_frame();
                }
            }) as Box<dyn FnMut(f64)>));
        }
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    });
}

fn tick(burst: &mut Burst) -> bool {
    let width = burst.canvas.width() as f64;
    let height = burst.canvas.height() as f64;
    burst.ctx.clear_rect(0.0, 0.0, width, height);

    for p in burst.particles.iter_mut() {
        p.step();
    }
    burst.particles.retain(|p| p.alive() && p.y < height + 20.0);

    for p in &burst.particles {
        let w = 6.0 + 4.0 * p.wobble.cos().abs();
        let h = 10.0 * p.wobble.sin().abs() + 2.0;
        burst.ctx.set_global_alpha(p.opacity());
        burst.ctx.set_fill_style(&JsValue::from_str(p.color));
        burst.ctx.fill_rect(p.x - w / 2.0, p.y - h / 2.0, w, h);
    }
    burst.ctx.set_global_alpha(1.0);

    if burst.particles.is_empty() {
        burst.ctx.clear_rect(0.0, 0.0, width, height);
        burst.running = false;
    }
    burst.running
}
