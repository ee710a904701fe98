//! Adapter for a splitter implemented in JavaScript
//!
//! The callback receives the target element and must return
//! `{ lines: Element[], revert: () => void }`, which is the shape SplitText-like
//! libraries hand back.

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Node;

use super::{LineSplitter, Split, LINE_CLASS};
use crate::dom::{Dom, WebDom};
use crate::error::RevealError;

fn split_error(context: &str, e: JsValue) -> RevealError {
    RevealError::Split(format!("{}: {:?}", context, e))
}

#[derive(Debug, Clone)]
pub struct JsSplitter {
    callback: Function,
}

impl JsSplitter {
    pub fn new(callback: Function) -> Self {
        Self { callback }
    }
}

/// The JS result object and its `revert` function
#[derive(Debug)]
pub struct JsSplitHandle {
    result: JsValue,
    revert: Function,
}

impl JsSplitter {
    fn collect_lines(dom: &mut WebDom, result: &JsValue) -> Result<Vec<Node>, RevealError> {
        let lines_array: Array = Reflect::get(result, &JsValue::from_str("lines"))
            .map_err(|e| split_error("missing `lines`", e))?
            .dyn_into()
            .map_err(|e| split_error("`lines` is not an array", e))?;

        let mut lines = Vec::with_capacity(lines_array.length() as usize);
        for value in lines_array.iter() {
            let line: Node = value
                .dyn_into()
                .map_err(|e| split_error("line is not a DOM node", e))?;
            dom.add_class(&line, LINE_CLASS)?;
            lines.push(line);
        }
        Ok(lines)
    }
}

impl LineSplitter<WebDom> for JsSplitter {
    type Handle = JsSplitHandle;

    fn split(&mut self, dom: &mut WebDom, target: &Node) -> Result<Split<Node, JsSplitHandle>, RevealError> {
        let result = self
            .callback
            .call1(&JsValue::NULL, target)
            .map_err(|e| split_error("splitter threw", e))?;

        let revert: Function = Reflect::get(&result, &JsValue::from_str("revert"))
            .map_err(|e| split_error("missing `revert`", e))?
            .dyn_into()
            .map_err(|e| split_error("`revert` is not a function", e))?;

        // The callback has already rearranged the target; undo it if its
        // result turns out to be unusable.
        match Self::collect_lines(dom, &result) {
            Ok(lines) => Ok(Split::new(target.clone(), lines, JsSplitHandle { result, revert })),
            Err(e) => {
                if let Err(revert_err) = revert.call0(&result) {
                    log::warn!("revert after failed split threw: {:?}", revert_err);
                }
                Err(e)
            }
        }
    }

    fn revert(&mut self, _dom: &mut WebDom, split: Split<Node, JsSplitHandle>) -> Result<(), RevealError> {
        split
            .handle
            .revert
            .call0(&split.handle.result)
            .map(|_| ())
            .map_err(|e| split_error("revert threw", e))
    }
}
