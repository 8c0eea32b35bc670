// src/picker/canvas.rs
//! Browser side of the picker: decoding uploads, reading pixels through an
//! off-screen canvas, painting the magnifier and scheduling frames.

use std::f64::consts::TAU;

use gloo::events::EventListener;
use gloo::file::{File, ObjectUrl};
use gloo::render::{request_animation_frame, AnimationFrame};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};
use yew::Callback;

use super::frame::FrameScheduler;
use super::sampler::{Bitmap, BitmapError, ImageSource};
use super::swatch::SwatchId;
use super::zoom::ZoomFrame;
use crate::widgets::js_message;

/// A decoded `<img>`; rasterized through a throwaway canvas on demand.
pub struct HtmlImageSource {
    image: HtmlImageElement,
}

impl HtmlImageSource {
    pub fn new(image: HtmlImageElement) -> Self {
        Self { image }
    }
}

impl ImageSource for HtmlImageSource {
    fn natural_size(&self) -> (u32, u32) {
        (self.image.natural_width(), self.image.natural_height())
    }

    fn rasterize(&self) -> Result<Bitmap, BitmapError> {
        let (width, height) = self.natural_size();
        let rgba = image_to_rgba(&self.image, width, height)
            .map_err(|e| BitmapError::Raster(js_message(&e)))?;
        Bitmap::new(width, height, rgba)
    }
}

fn image_to_rgba(image: &HtmlImageElement, width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
    let canvas = create_canvas()?;
    canvas.set_width(width);
    canvas.set_height(height);
    let ctx = context_2d(&canvas)?;
    ctx.draw_image_with_html_image_element(image, 0.0, 0.0)
        .map_err(|_| JsValue::from_str("image_draw_failed"))?;
    let data = ctx
        .get_image_data(0.0, 0.0, width as f64, height as f64)
        .map_err(|_| JsValue::from_str("image_read_failed"))?;
    Ok(data.data().to_vec())
}

fn create_canvas() -> Result<HtmlCanvasElement, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str("not a canvas"))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| JsValue::from_str("not a 2d context"))
}

/// An upload being decoded. Dropping it detaches the listeners and revokes
/// the object URL, which abandons the load.
pub struct PendingImage {
    _url: ObjectUrl,
    _load: EventListener,
    _error: EventListener,
}

impl PendingImage {
    /// Keeps the object URL alive for the `<img>` that displays the upload.
    pub fn into_url(self) -> ObjectUrl {
        self._url
    }
}

/// Decodes `file` into an `<img>`; `on_done` fires once with the element or
/// an error message.
pub fn decode_image(
    file: File,
    on_done: Callback<Result<HtmlImageElement, String>>,
) -> Result<PendingImage, String> {
    let image = HtmlImageElement::new().map_err(|e| js_message(&e))?;
    let url = ObjectUrl::from(file);

    let load = {
        let loaded = image.clone();
        let on_done = on_done.clone();
        EventListener::once(&image, "load", move |_| {
            on_done.emit(Ok(loaded.clone()));
        })
    };
    let error = EventListener::once(&image, "error", move |_| {
        on_done.emit(Err("The browser could not decode this image.".to_string()));
    });
    image.set_src(&url);

    Ok(PendingImage {
        _url: url,
        _load: load,
        _error: error,
    })
}

/// `requestAnimationFrame`-backed scheduler. The frame callback is routed
/// back to the panel, which calls `ColorPicker::run_frame`.
pub struct AnimationFrames {
    on_frame: Callback<SwatchId>,
}

impl AnimationFrames {
    pub fn new(on_frame: Callback<SwatchId>) -> Self {
        Self { on_frame }
    }
}

impl FrameScheduler for AnimationFrames {
    type Handle = AnimationFrame;

    fn request_frame(&mut self, swatch: SwatchId) -> AnimationFrame {
        let on_frame = self.on_frame.clone();
        request_animation_frame(move |_| on_frame.emit(swatch))
    }
}

/// Paints one magnifier frame: clipped circle of pixel cells, crosshair
/// around the center cell, ring on top.
pub fn draw_zoom(canvas: &HtmlCanvasElement, frame: &ZoomFrame) -> Result<(), JsValue> {
    let size = frame.size.round().max(1.0) as u32;
    if canvas.width() != size || canvas.height() != size {
        canvas.set_width(size);
        canvas.set_height(size);
    }
    let ctx = context_2d(canvas)?;
    let s = size as f64;
    let r = s / 2.0;
    let cell = frame.cell_size();

    ctx.clear_rect(0.0, 0.0, s, s);
    ctx.save();
    ctx.begin_path();
    ctx.arc(r, r, r - 1.0, 0.0, TAU)?;
    ctx.clip();

    ctx.set_fill_style_str("#1e1e1e");
    ctx.fill_rect(0.0, 0.0, s, s);
    let cells = frame.cells as usize;
    for (i, color) in frame.colors.iter().enumerate() {
        let Some(color) = color else { continue };
        let (cx, cy) = ((i % cells) as f64, (i / cells) as f64);
        ctx.set_fill_style_str(&color.css());
        // +0.5 hides hairline seams between cells
        ctx.fill_rect(cx * cell, cy * cell, cell + 0.5, cell + 0.5);
    }

    let mid = (frame.cells / 2) as f64 * cell;
    let stroke = frame
        .center_color()
        .map(|c| c.contrasting_text())
        .unwrap_or(super::color::Rgb::WHITE);
    ctx.set_line_width(1.5);
    ctx.set_stroke_style_str(&stroke.css());
    ctx.stroke_rect(mid, mid, cell, cell);
    ctx.begin_path();
    ctx.move_to(r, 0.0);
    ctx.line_to(r, mid);
    ctx.move_to(r, mid + cell);
    ctx.line_to(r, s);
    ctx.move_to(0.0, r);
    ctx.line_to(mid, r);
    ctx.move_to(mid + cell, r);
    ctx.line_to(s, r);
    ctx.stroke();
    ctx.restore();

    ctx.begin_path();
    ctx.arc(r, r, r - 1.0, 0.0, TAU)?;
    ctx.set_line_width(2.0);
    ctx.set_stroke_style_str("#ffffff");
    ctx.stroke();
    Ok(())
}
