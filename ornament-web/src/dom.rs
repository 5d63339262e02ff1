use chrono::Local;
use ornament_sim::countdown::next_occurrence;
use ornament_sim::{Countdown, CountdownDigits, CountdownDisplay};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

const TICK_MS: i32 = 1000;

/// The four text nodes inside the countdown container.
struct DomDisplay {
    days: Element,
    hours: Element,
    minutes: Element,
    seconds: Element,
}

impl CountdownDisplay for DomDisplay {
    fn show(&mut self, digits: &CountdownDigits) {
        self.days.set_text_content(Some(&digits.days));
        self.hours.set_text_content(Some(&digits.hours));
        self.minutes.set_text_content(Some(&digits.minutes));
        self.seconds.set_text_content(Some(&digits.seconds));
    }
}

fn append_div(document: &Document, parent: &Element, class: &str) -> Result<Element, JsValue> {
    let div = document.create_element("div")?;
    div.set_class_name(class);
    parent.append_child(&div)?;
    Ok(div)
}

/// Countdown rendered into the page, ticking once a second.
///
/// Dropping it or calling [`DomCountdown::cancel`] clears the interval.
pub struct DomCountdown {
    interval: Option<i32>,
    tick: Option<Closure<dyn FnMut()>>,
}

impl DomCountdown {
    /// Mount under the first element matching `selector`.
    ///
    /// A missing container is logged and yields an inactive countdown.
    pub fn mount(document: &Document, selector: &str, month: u32, day: u32) -> Result<Self, JsValue> {
        let Some(container) = document.query_selector(selector)? else {
            log::warn!("Countdown container {selector:?} not found, countdown disabled");
            return Ok(Self::inactive());
        };

        let target = next_occurrence(month, day, &Local::now())
            .map_err(|e| JsValue::from_str(&format!("Invalid countdown date: {e}")))?;
        log::info!("Counting down to {target}");
        let countdown = Countdown::new(target);

        let mut display = DomDisplay {
            days: append_div(document, &container, "date")?,
            hours: append_div(document, &container, "hours")?,
            minutes: append_div(document, &container, "minutes")?,
            seconds: append_div(document, &container, "seconds")?,
        };

        let tick = Closure::wrap(Box::new(move || {
            countdown.tick(&Local::now(), &mut display);
        }) as Box<dyn FnMut()>);

        let window = web_sys::window().ok_or("No window")?;
        let interval = window.set_interval_with_callback_and_timeout_and_arguments_0(
            tick.as_ref().unchecked_ref(),
            TICK_MS,
        )?;

        Ok(Self {
            interval: Some(interval),
            tick: Some(tick),
        })
    }

    pub fn inactive() -> Self {
        Self {
            interval: None,
            tick: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.interval.is_some()
    }

    pub fn cancel(&mut self) {
        if let Some(interval) = self.interval.take() {
            if let Some(window) = web_sys::window() {
                window.clear_interval_with_handle(interval);
            }
            log::debug!("Countdown cancelled");
        }
        self.tick = None;
    }
}

impl Drop for DomCountdown {
    fn drop(&mut self) {
        self.cancel();
    }
}
