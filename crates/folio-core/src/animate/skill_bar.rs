#![forbid(unsafe_code)]

//! Skill bars: set the width the stylesheet transition animates toward.

use crate::dom::{Dom, ElementId, selectors};
use crate::error::{FolioError, Result};

/// Parse a `data-progress` percentage. Values above 100 are clamped.
pub fn parse_progress(el: ElementId, raw: &str) -> Result<u8> {
    let value = raw
        .trim()
        .parse::<u32>()
        .map_err(|_| FolioError::invalid_attribute(el, selectors::DATA_PROGRESS, raw))?;
    Ok(value.min(100) as u8)
}

/// Sets each bar's width to its stored percentage.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkillBarAnimator;

impl SkillBarAnimator {
    /// Apply `data-progress` as the bar width.
    ///
    /// Returns `Ok(false)` when the width already matched.
    pub fn animate<D: Dom + ?Sized>(&self, dom: &D, el: ElementId) -> Result<bool> {
        let raw = dom
            .attribute(el, selectors::DATA_PROGRESS)
            .ok_or(FolioError::MissingAttribute {
                element: el,
                name: selectors::DATA_PROGRESS,
            })?;
        let width = format!("{}%", parse_progress(el, &raw)?);
        if dom.style(el, "width").as_deref() == Some(width.as_str()) {
            return Ok(false);
        }
        dom.set_style(el, "width", &width);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDom;

    use pretty_assertions::assert_eq;

    #[test]
    fn width_follows_progress_attribute() {
        let dom = MemoryDom::new();
        let bar = dom
            .element("div")
            .class("skill-progress")
            .attr("data-progress", "85")
            .append();
        let bars = SkillBarAnimator;
        assert!(bars.animate(&dom, bar).unwrap());
        assert_eq!(dom.style(bar, "width").as_deref(), Some("85%"));
        assert!(!bars.animate(&dom, bar).unwrap(), "second call is a no-op");
    }

    #[test]
    fn out_of_range_progress_is_clamped() {
        assert_eq!(parse_progress(ElementId::new(0), "140").unwrap(), 100);
        assert_eq!(parse_progress(ElementId::new(0), "0").unwrap(), 0);
        assert!(parse_progress(ElementId::new(0), "half").is_err());
    }
}
