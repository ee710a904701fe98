//! `RevealText` JS class
//!
//! One instance per content root. The page drives it:
//!
//! ```js
//! const reveal = new RevealText(el, { blockColor: "#e63946" }, false);
//! reveal.mount();
//! window.addEventListener("scroll", () => reveal.refreshTriggers());
//! let last = performance.now();
//! requestAnimationFrame(function frame(now) {
//!   reveal.tick((now - last) / 1000);
//!   last = now;
//!   requestAnimationFrame(frame);
//! });
//! ```

use js_sys::Function;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Node};

use super::helpers::{deserialize_config, serialize_config, to_js_error};
use crate::anim::Engine;
use crate::dom::WebDom;
use crate::error::RevealError;
use crate::reveal::{mark_multi_host, MountOutcome, RevealOrchestrator};
use crate::split::js::JsSplitHandle;
use crate::split::{JsSplitter, LineSplitter, Split, WrapSplitter};

/// Either the built-in word wrapper or a splitter supplied from JS
enum BrowserSplitter {
    Wrap(WrapSplitter),
    Js(JsSplitter),
}

enum BrowserSplitHandle {
    Wrap(Vec<Node>),
    Js(JsSplitHandle),
}

impl LineSplitter<WebDom> for BrowserSplitter {
    type Handle = BrowserSplitHandle;

    fn split(&mut self, dom: &mut WebDom, target: &Node) -> Result<Split<Node, BrowserSplitHandle>, RevealError> {
        match self {
            BrowserSplitter::Wrap(splitter) => {
                let split = splitter.split(dom, target)?;
                Ok(Split::new(split.target, split.lines, BrowserSplitHandle::Wrap(split.handle)))
            }
            BrowserSplitter::Js(splitter) => {
                let split = splitter.split(dom, target)?;
                Ok(Split::new(split.target, split.lines, BrowserSplitHandle::Js(split.handle)))
            }
        }
    }

    fn revert(&mut self, dom: &mut WebDom, split: Split<Node, BrowserSplitHandle>) -> Result<(), RevealError> {
        let Split {
            target,
            lines,
            handle,
        } = split;
        match (self, handle) {
            (BrowserSplitter::Wrap(splitter), BrowserSplitHandle::Wrap(handle)) => {
                splitter.revert(dom, Split::new(target, lines, handle))
            }
            (BrowserSplitter::Js(splitter), BrowserSplitHandle::Js(handle)) => {
                splitter.revert(dom, Split::new(target, lines, handle))
            }
            _ => Err(RevealError::Split(
                "split handle belongs to a different splitter".to_string(),
            )),
        }
    }
}

type BrowserOrchestrator = RevealOrchestrator<WebDom, BrowserSplitter, Engine<Node>>;

#[wasm_bindgen]
pub struct RevealText {
    dom: WebDom,
    root: Node,
    orchestrator: BrowserOrchestrator,
}

impl RevealText {
    fn build(root: Element, config: JsValue, multi_host: bool, splitter: BrowserSplitter) -> Result<RevealText, JsValue> {
        crate::init();

        let config = deserialize_config(config)?;
        let mut dom = WebDom::from_window().map_err(|e| to_js_error("No DOM available", e))?;
        let root: Node = root.into();
        if multi_host {
            mark_multi_host(&mut dom, &root).map_err(|e| to_js_error("Failed to mark host", e))?;
        }
        let orchestrator = RevealOrchestrator::new(config, splitter, Engine::new())
            .map_err(|e| to_js_error("Failed to create reveal", e))?;

        Ok(RevealText {
            dom,
            root,
            orchestrator,
        })
    }
}

#[wasm_bindgen]
impl RevealText {
    /// Reveal `root` using the built-in word-wrap splitter. With `multi_host`,
    /// each direct child of `root` is split and numbered on its own.
    #[wasm_bindgen(constructor)]
    pub fn new(root: Element, config: JsValue, multi_host: bool) -> Result<RevealText, JsValue> {
        Self::build(root, config, multi_host, BrowserSplitter::Wrap(WrapSplitter::default()))
    }

    /// Like the constructor, but lines come from `splitter(element)`, which
    /// must return `{ lines: Element[], revert: () => void }`.
    #[wasm_bindgen(js_name = withSplitter)]
    pub fn with_splitter(
        root: Element,
        config: JsValue,
        multi_host: bool,
        splitter: Function,
    ) -> Result<RevealText, JsValue> {
        Self::build(root, config, multi_host, BrowserSplitter::Js(JsSplitter::new(splitter)))
    }

    /// Build the reveal. Returns the number of lines (0 if the root is not in the page).
    pub fn mount(&mut self) -> Result<usize, JsValue> {
        let outcome = self
            .orchestrator
            .mount(&mut self.dom, Some(&self.root))
            .map_err(|e| to_js_error("Mount failed", e))?;
        Ok(match outcome {
            MountOutcome::Mounted { lines } => lines,
            MountOutcome::Skipped | MountOutcome::Unchanged => 0,
        })
    }

    /// Stop all animation and restore the original markup
    pub fn unmount(&mut self) -> Result<(), JsValue> {
        self.orchestrator
            .unmount(&mut self.dom)
            .map_err(|e| to_js_error("Unmount failed", e))
    }

    /// Apply a new config. Returns true if the reveal was rebuilt.
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, config: JsValue) -> Result<bool, JsValue> {
        let config = deserialize_config(config)?;
        let outcome = self
            .orchestrator
            .reconfigure(&mut self.dom, config)
            .map_err(|e| to_js_error("Reconfigure failed", e))?;
        Ok(matches!(outcome, MountOutcome::Mounted { .. }))
    }

    #[wasm_bindgen(js_name = getConfig)]
    pub fn get_config(&self) -> Result<JsValue, JsValue> {
        serialize_config(self.orchestrator.config())
    }

    /// Advance animations by `dt` seconds; call once per animation frame
    pub fn tick(&mut self, dt: f64) -> Result<(), JsValue> {
        self.orchestrator
            .animator_mut()
            .tick(&mut self.dom, dt)
            .map_err(|e| to_js_error("Tick failed", e))
    }

    /// Re-check scroll triggers; call on scroll and resize
    #[wasm_bindgen(js_name = refreshTriggers)]
    pub fn refresh_triggers(&mut self) {
        self.orchestrator.animator_mut().refresh_triggers(&self.dom);
    }

    #[wasm_bindgen(js_name = lineCount)]
    pub fn line_count(&self) -> usize {
        self.orchestrator.line_count()
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.orchestrator.is_mounted()
    }

    /// True when nothing is currently animating
    #[wasm_bindgen(js_name = isIdle)]
    pub fn is_idle(&self) -> bool {
        self.orchestrator.animator().is_idle()
    }
}

impl Drop for RevealText {
    fn drop(&mut self) {
        if let Err(e) = self.orchestrator.unmount(&mut self.dom) {
            log::warn!("reveal teardown on drop failed: {}", e);
        }
    }
}
