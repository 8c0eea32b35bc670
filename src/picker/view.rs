// src/picker/view.rs
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::console;
use gloo::events::EventListener;
use gloo::file::ObjectUrl;
use gloo_timers::callback::Timeout;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlCanvasElement, HtmlImageElement, HtmlInputElement};
use yew::prelude::*;

use super::canvas::{decode_image, draw_zoom, AnimationFrames, HtmlImageSource, PendingImage};
use super::color::Rgb;
use super::geometry::{fit_within, Point, Size};
use super::listeners::{choose_image, files_of, ImageInputSubscription};
use super::palette::{self, PaletteEntry};
use super::sampler::ImageSource;
use super::swatch::{ColorMode, SwatchId};
use super::upload::UploadError;
use super::ColorPicker;
use crate::config::PickerSettings;
use crate::widgets::{copy_to_clipboard, copy_with_message, js_message, msg_view};

type SharedPicker = Rc<RefCell<ColorPicker<AnimationFrames>>>;

const MAX_STAGE_HEIGHT: f64 = 480.0;
const FALLBACK_STAGE_WIDTH: f64 = 800.0;

#[derive(Properties, PartialEq)]
pub struct ColorPickerPanelProps {
    pub settings: PickerSettings,
    pub on_settings: Callback<PickerSettings>,
}

/// Room available for the image: the panel width, capped in height.
fn stage_bounds(wrap: &NodeRef) -> Size {
    let width = wrap
        .cast::<Element>()
        .map(|el| el.client_width() as f64)
        .filter(|w| *w > 0.0)
        .unwrap_or(FALLBACK_STAGE_WIDTH);
    Size::new(width, MAX_STAGE_HEIGHT)
}

/// Pointer position relative to the stage's top-left corner.
fn local_point(stage: &NodeRef, e: &MouseEvent) -> Option<Point> {
    let el = stage.cast::<Element>()?;
    let rect = el.get_bounding_client_rect();
    Some(Point::new(
        e.client_x() as f64 - rect.left(),
        e.client_y() as f64 - rect.top(),
    ))
}

fn mode_label(mode: ColorMode) -> &'static str {
    match mode {
        ColorMode::Sampled => "sampled",
        ColorMode::Manual => "manual",
    }
}

#[function_component(ColorPickerPanel)]
pub fn color_picker_panel(props: &ColorPickerPanelProps) -> Html {
    let update = use_force_update();
    let msg = use_state(String::new);
    let wrap_ref = use_node_ref();
    let stage_ref = use_node_ref();
    let zoom_ref = use_node_ref();
    let pending = use_mut_ref(|| None::<PendingImage>);
    let shown = use_mut_ref(|| None::<ObjectUrl>);

    let picker: SharedPicker = {
        let update = update.clone();
        let settings = props.settings.clone();
        let handle = use_state(move || -> SharedPicker {
            Rc::new_cyclic(|weak: &Weak<RefCell<ColorPicker<AnimationFrames>>>| {
                let weak = weak.clone();
                let on_frame = Callback::from(move |id: SwatchId| {
                    if let Some(picker) = weak.upgrade() {
                        picker.borrow_mut().run_frame(id);
                        update.force_update();
                    }
                });
                RefCell::new(ColorPicker::new(AnimationFrames::new(on_frame), settings))
            })
        });
        (*handle).clone()
    };

    // settings from the shell
    {
        let picker = picker.clone();
        let update = update.clone();
        use_effect_with(props.settings.clone(), move |settings| {
            picker.borrow_mut().set_settings(settings.clone());
            update.force_update();
            || ()
        });
    }

    let load_files = {
        let picker = picker.clone();
        let update = update.clone();
        let msg = msg.clone();
        let pending = pending.clone();
        let shown = shown.clone();
        let wrap_ref = wrap_ref.clone();
        Callback::from(move |files: Vec<web_sys::File>| {
            let max = picker.borrow().settings().max_upload_bytes;
            let file = match choose_image(files, max) {
                Ok(f) => f,
                Err(e) => {
                    console::warn!(format!("image rejected: {e}"));
                    msg.set(e.to_string());
                    return;
                }
            };
            let name = file.name();
            let ticket = picker.borrow_mut().begin_image_load();
            msg.set(format!("Loading \"{name}\"..."));
            update.force_update();

            let on_done = {
                let picker = picker.clone();
                let update = update.clone();
                let msg = msg.clone();
                let pending = pending.clone();
                let shown = shown.clone();
                let wrap_ref = wrap_ref.clone();
                let name = name.clone();
                Callback::from(move |result: Result<HtmlImageElement, String>| {
                    let url = pending.borrow_mut().take().map(PendingImage::into_url);
                    let mut p = picker.borrow_mut();
                    match result {
                        Ok(image) => {
                            let source = HtmlImageSource::new(image);
                            let natural = source.natural_size();
                            let fitted = fit_within(natural, stage_bounds(&wrap_ref));
                            *shown.borrow_mut() = url;
                            match p.finish_image_load(ticket, Rc::new(source), fitted) {
                                Ok(_) => {
                                    console::log!(format!(
                                        "loaded \"{name}\" ({}x{})",
                                        natural.0, natural.1
                                    ));
                                    msg.set(format!(
                                        "Loaded \"{name}\" ({}x{}). Drag a marker or click the image to add one.",
                                        natural.0, natural.1
                                    ));
                                }
                                Err(e) => {
                                    console::error!(format!("rasterize \"{name}\": {e}"));
                                    msg.set(format!("Failed to read pixels of \"{name}\": {e}"));
                                }
                            }
                        }
                        Err(e) => {
                            p.fail_image_load(ticket);
                            console::warn!(format!("decode \"{name}\": {e}"));
                            msg.set(UploadError::Decode { name: name.clone() }.to_string());
                        }
                    }
                    drop(p);
                    update.force_update();
                })
            };

            match decode_image(gloo::file::File::from(file), on_done) {
                // replacing the previous pending load detaches its listeners
                Ok(p) => *pending.borrow_mut() = Some(p),
                Err(e) => {
                    picker.borrow_mut().fail_image_load(ticket);
                    console::error!(e.clone());
                    msg.set(format!("Image load failed: {e}"));
                    update.force_update();
                }
            }
        })
    };

    // paste / drop anywhere on the page while this panel is mounted
    {
        let load_files = load_files.clone();
        use_effect_with((), move |_| {
            let sub = ImageInputSubscription::attach(load_files);
            if sub.is_none() {
                console::warn!("paste and drop input unavailable");
            }
            move || drop(sub)
        });
    }

    // refit on window resize; sampled swatches re-read their pixel
    {
        let picker = picker.clone();
        let update = update.clone();
        let wrap_ref = wrap_ref.clone();
        use_effect_with((), move |_| {
            let listener = web_sys::window().map(|w| {
                EventListener::new(&w, "resize", move |_| {
                    let Some(natural) = picker.borrow().natural_size() else {
                        return;
                    };
                    picker
                        .borrow_mut()
                        .set_container(fit_within(natural, stage_bounds(&wrap_ref)));
                    update.force_update();
                })
            });
            move || drop(listener)
        });
    }

    // unmount: no drag or frame outlives the panel
    {
        let picker = picker.clone();
        let pending = pending.clone();
        use_effect_with((), move |_| {
            move || {
                if let Ok(mut p) = picker.try_borrow_mut() {
                    p.abandon_drag();
                }
                pending.borrow_mut().take();
            }
        });
    }

    // magnifier paint, once per committed frame
    {
        let picker = picker.clone();
        let zoom_ref = zoom_ref.clone();
        let deps = {
            let p = picker.borrow();
            (p.zoom().redraws(), p.zoom().is_visible())
        };
        use_effect_with(deps, move |_| {
            let frame = picker.borrow_mut().zoom_frame();
            if let (Some(frame), Some(canvas)) = (frame, zoom_ref.cast::<HtmlCanvasElement>()) {
                if let Err(e) = draw_zoom(&canvas, &frame) {
                    console::warn!(e);
                }
            }
            || ()
        });
    }

    let on_file = {
        let load_files = load_files.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            if let Some(list) = input.files() {
                load_files.emit(files_of(&list));
            }
            input.set_value("");
        })
    };

    let on_marker_down = {
        let picker = picker.clone();
        let update = update.clone();
        let stage_ref = stage_ref.clone();
        Callback::from(move |(id, e): (SwatchId, PointerEvent)| {
            e.prevent_default();
            let Some(point) = local_point(&stage_ref, &e) else {
                return;
            };
            if let Some(el) = e.target_dyn_into::<Element>() {
                if let Err(err) = el.set_pointer_capture(e.pointer_id()) {
                    console::warn!(format!("pointer capture: {}", js_message(&err)));
                }
            }
            if picker.borrow_mut().pointer_down(id, point).is_some() {
                update.force_update();
            }
        })
    };

    let on_pointer_move = {
        let picker = picker.clone();
        let stage_ref = stage_ref.clone();
        Callback::from(move |e: PointerEvent| {
            if picker.borrow().dragging().is_none() {
                return;
            }
            if let Some(point) = local_point(&stage_ref, &e) {
                picker.borrow_mut().pointer_move(point);
            }
        })
    };

    let on_pointer_up = {
        let picker = picker.clone();
        let update = update.clone();
        Callback::from(move |_e: PointerEvent| {
            let events = picker.borrow_mut().pointer_up();
            if !events.is_empty() {
                update.force_update();
            }
        })
    };

    let on_stage_click = {
        let picker = picker.clone();
        let update = update.clone();
        let stage_ref = stage_ref.clone();
        Callback::from(move |e: MouseEvent| {
            let Some(point) = local_point(&stage_ref, &e) else {
                return;
            };
            if picker.borrow_mut().add_swatch_at(point).is_some() {
                update.force_update();
            }
        })
    };

    let on_copy_hex = {
        let picker = picker.clone();
        let update = update.clone();
        Callback::from(move |(id, hex): (SwatchId, String)| {
            let weak = Rc::downgrade(&picker);
            let update = update.clone();
            spawn_local(async move {
                let result = copy_to_clipboard(hex).await;
                if let Err(e) = &result {
                    console::warn!(e.clone());
                }
                let Some(picker) = weak.upgrade() else {
                    return;
                };
                let seq = picker
                    .borrow_mut()
                    .copy_feedback_mut()
                    .record(id, result.is_ok());
                let ms = picker.borrow().settings().copy_feedback_ms;
                update.force_update();

                let weak = Rc::downgrade(&picker);
                Timeout::new(ms, move || {
                    if let Some(picker) = weak.upgrade() {
                        picker.borrow_mut().copy_feedback_mut().expire(seq);
                        update.force_update();
                    }
                })
                .forget();
            });
        })
    };

    let on_manual = {
        let picker = picker.clone();
        let update = update.clone();
        let msg = msg.clone();
        Callback::from(move |(id, value): (SwatchId, String)| match Rgb::from_hex(&value) {
            Ok(color) => {
                picker.borrow_mut().set_manual_color(id, color);
                update.force_update();
            }
            Err(e) => msg.set(e),
        })
    };

    let on_delete = {
        let picker = picker.clone();
        let update = update.clone();
        Callback::from(move |id: SwatchId| {
            if picker.borrow_mut().remove(id).is_some() {
                update.force_update();
            }
        })
    };

    let on_copy_all = {
        let picker = picker.clone();
        let msg = msg.clone();
        Callback::from(move |_| {
            let entries = picker.borrow().palette();
            if entries.is_empty() {
                msg.set("Nothing to copy yet.".into());
                return;
            }
            copy_with_message(palette::as_hex_lines(&entries), msg.clone(), "Copied all colors");
        })
    };

    let on_export_json = {
        let picker = picker.clone();
        let msg = msg.clone();
        Callback::from(move |_| {
            let entries = picker.borrow().palette();
            match palette::as_json(&entries) {
                Ok(json) => copy_with_message(json, msg.clone(), "Copied palette JSON"),
                Err(e) => msg.set(e),
            }
        })
    };

    let on_clear = {
        let picker = picker.clone();
        let update = update.clone();
        let msg = msg.clone();
        let pending = pending.clone();
        let shown = shown.clone();
        Callback::from(move |_| {
            pending.borrow_mut().take();
            picker.borrow_mut().clear();
            shown.borrow_mut().take();
            msg.set(String::new());
            update.force_update();
        })
    };

    let on_zoom_change = {
        let settings = props.settings.clone();
        let on_settings = props.on_settings.clone();
        Callback::from(move |e: Event| {
            let v: HtmlInputElement = e.target_unchecked_into();
            if let Ok(zoom) = v.value().parse::<u32>() {
                on_settings.emit(PickerSettings {
                    zoom,
                    ..settings.clone()
                });
            }
        })
    };

    let on_diameter_change = {
        let settings = props.settings.clone();
        let on_settings = props.on_settings.clone();
        Callback::from(move |e: Event| {
            let v: HtmlInputElement = e.target_unchecked_into();
            if let Ok(d) = v.value().parse::<f64>() {
                on_settings.emit(PickerSettings {
                    swatch_diameter: d,
                    ..settings.clone()
                });
            }
        })
    };

    // ---- render ----
    let mut p = picker.borrow_mut();
    let zoom_frame = p.zoom_frame();
    let settings = p.settings().clone();
    let container = p.container();
    let entries: Vec<PaletteEntry> = p.palette();
    let dragging = p.dragging();
    let loading = p.is_loading();
    let has_image = p.has_image();
    let feedback = *p.copy_feedback();
    let markers: Vec<(SwatchId, Point, Rgb)> =
        p.swatches().iter().map(|s| (s.id, s.position, s.color)).collect();
    drop(p);

    let url = shown.borrow().as_ref().map(|u| u.to_string());
    let d = settings.swatch_diameter;

    let stage = match url {
        Some(src) if has_image || loading => {
            let style = format!(
                "position:relative;width:{}px;height:{}px;touch-action:none;user-select:none;",
                container.width, container.height
            );
            html! {
                <div class="picker-stage" ref={stage_ref.clone()} style={style}
                     onpointermove={on_pointer_move}
                     onpointerup={on_pointer_up.clone()}
                     onpointercancel={on_pointer_up}
                     onclick={on_stage_click}>
                    <img src={src} draggable="false" alt="uploaded"
                         style="width:100%;height:100%;display:block;pointer-events:none;" />
                    { for markers.iter().map(|(id, pos, color)| {
                        let id = *id;
                        let down = on_marker_down.clone();
                        let style = format!(
                            "position:absolute;left:{}px;top:{}px;width:{d}px;height:{d}px;\
                             border-radius:50%;background:{};border:2px solid {};\
                             box-shadow:0 0 0 1px rgba(0,0,0,.5);cursor:grab;",
                            pos.x, pos.y, color.css(), color.contrasting_text().css()
                        );
                        let class = if dragging == Some(id) { "marker dragging" } else { "marker" };
                        html! {
                            <div key={id.get()} class={class} style={style} title={color.to_hex()}
                                 onpointerdown={move |e: PointerEvent| down.emit((id, e))}
                                 onclick={|e: MouseEvent| e.stop_propagation()} />
                        }
                    }) }
                    { if let Some(frame) = &zoom_frame {
                        let style = format!(
                            "position:absolute;left:{}px;top:{}px;width:{s}px;height:{s}px;\
                             pointer-events:none;border-radius:50%;",
                            frame.placement.x, frame.placement.y, s = frame.size
                        );
                        html! { <canvas class="zoom" ref={zoom_ref.clone()} style={style} /> }
                    } else {
                        html! {}
                    } }
                </div>
            }
        }
        _ => html! {
            <div class="dropzone smallnote">
                { "Choose, paste or drop an image to start picking colors." }
            </div>
        },
    };

    html! {
        <div class="panel">
            <h2>{ "Image Color Picker" }</h2>
            <div class="row">
                <input type="file" accept="image/*" onchange={on_file} />
                <label class="smallnote">{ "Zoom " }
                    <input type="number" min="2" max="32" value={settings.zoom.to_string()}
                           onchange={on_zoom_change} />
                </label>
                <label class="smallnote">{ "Marker " }
                    <input type="number" min="8" max="64" value={settings.swatch_diameter.to_string()}
                           onchange={on_diameter_change} />
                </label>
                <button class="btn" onclick={on_clear} disabled={!has_image && !loading}>{ "Clear" }</button>
            </div>
            { msg_view(&msg) }
            <div class="block" ref={wrap_ref.clone()}>{ stage }</div>

            <div class="row">
                <h3>{ format!("Palette ({})", entries.len()) }</h3>
                <button class="btn" onclick={on_copy_all} disabled={entries.is_empty()}>{ "Copy all" }</button>
                <button class="btn" onclick={on_export_json} disabled={entries.is_empty()}>{ "Export JSON" }</button>
            </div>
            <ul class="palette">
                { for entries.iter().map(|entry| {
                    let id = entry.id;
                    let hex = entry.hex();
                    let copy = {
                        let on_copy_hex = on_copy_hex.clone();
                        let hex = hex.clone();
                        Callback::from(move |_| on_copy_hex.emit((id, hex.clone())))
                    };
                    let recolor = {
                        let on_manual = on_manual.clone();
                        Callback::from(move |e: InputEvent| {
                            let v: HtmlInputElement = e.target_unchecked_into();
                            on_manual.emit((id, v.value()));
                        })
                    };
                    let delete = {
                        let on_delete = on_delete.clone();
                        Callback::from(move |_| on_delete.emit(id))
                    };
                    let copy_label = match feedback.for_swatch(id) {
                        Some(true) => "Copied",
                        Some(false) => "Copy failed",
                        None => "Copy",
                    };
                    html! {
                        <li key={id.get()} class="palette-entry">
                            <span class="chip" style={format!("background:{};", entry.color.css())} />
                            <span class="mono">{ format!("#{} {}", entry.index + 1, hex) }</span>
                            <span class="smallnote">{ mode_label(entry.mode) }</span>
                            <button class="btn" onclick={copy}>{ copy_label }</button>
                            <input type="color" value={hex.to_lowercase()} oninput={recolor} />
                            <button class="btn" onclick={delete}>{ "Delete" }</button>
                        </li>
                    }
                }) }
            </ul>
        </div>
    }
}
