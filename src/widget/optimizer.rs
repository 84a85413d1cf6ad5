//! SVG minification with the default oxvg job set

use oxvg_ast::parse::roxmltree::parse;
use oxvg_ast::serialize::Node as _;
use oxvg_ast::visitor::Info;
use oxvg_optimiser::Jobs;

use crate::errors::{WidgetError, WidgetResult};

/// Optimises rendered markup; parse, job and serialise failures all surface
/// as [`WidgetError::Optimize`].
pub fn optimize(svg: &str) -> WidgetResult<String> {
    parse(svg, |dom, allocator| {
        let jobs = Jobs::default();
        jobs.run(dom, &Info::new(allocator))
            .map_err(|_| WidgetError::optimize("optimisation jobs failed"))?;
        dom.serialize()
            .map_err(|_| WidgetError::optimize("failed to serialise optimised document"))
    })
    .map_err(|_| WidgetError::optimize("rendered markup is not well-formed SVG"))?
}
