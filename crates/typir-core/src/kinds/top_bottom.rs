//! The `Top`/`Bottom` kinds (spec §4.4.6): per-engine singletons. On
//! creation, `Top` registers a graph listener that marks every existing
//! and future type as its sub-type; `Bottom` symmetrically marks itself
//! as sub-type of every other type. Cycle checking is suppressed for
//! these bulk markings (spec: "Cycle check suppressed for these bulk
//! markings").

use crate::graph::{GraphListener, Preconditions, TypeGraph};
use crate::ids::TypeId;
use crate::kind::KindTag;
use crate::node::KindData;
use crate::relations::subtype::SubTypeService;
use std::rc::Rc;

const TOP_IDENTIFIER: &str = "Top";
const BOTTOM_IDENTIFIER: &str = "Bottom";

#[derive(Default, Clone, Copy)]
pub struct TopKind;

impl TopKind {
    pub fn new() -> Self {
        Self
    }

    /// Idempotent: returns the existing singleton if one was already
    /// created for this graph.
    pub fn get_or_create<N: 'static + Clone>(&self, graph: &Rc<TypeGraph<N>>, subtype: &Rc<SubTypeService<N>>) -> TypeId {
        if let Some(existing) = graph.get_by_identifier(TOP_IDENTIFIER) {
            return existing;
        }
        let id = graph.register_node(KindTag::Top, "Top".to_string(), "Top".to_string());
        graph.set_kind_data(id, KindData::Top);
        graph
            .set_identifier(id, TOP_IDENTIFIER)
            .expect("fresh Top node cannot collide");
        graph.define_initialization_process(id, Preconditions::default());
        graph.advance_pending(None);

        let listener: Rc<dyn GraphListener<N>> = Rc::new(TopListener {
            top: id,
            subtype: Rc::clone(subtype),
        });
        graph.add_listener(listener, true);
        id
    }
}

struct TopListener<N> {
    top: TypeId,
    subtype: Rc<SubTypeService<N>>,
}

impl<N: 'static + Clone> GraphListener<N> for TopListener<N> {
    fn on_added_type(&self, graph: &TypeGraph<N>, id: TypeId) {
        if id != self.top {
            let _ = self.subtype.mark_as_subtype_unchecked(graph, id, self.top);
        }
    }
}

#[derive(Default, Clone, Copy)]
pub struct BottomKind;

impl BottomKind {
    pub fn new() -> Self {
        Self
    }

    pub fn get_or_create<N: 'static + Clone>(&self, graph: &Rc<TypeGraph<N>>, subtype: &Rc<SubTypeService<N>>) -> TypeId {
        if let Some(existing) = graph.get_by_identifier(BOTTOM_IDENTIFIER) {
            return existing;
        }
        let id = graph.register_node(KindTag::Bottom, "Bottom".to_string(), "Bottom".to_string());
        graph.set_kind_data(id, KindData::Bottom);
        graph
            .set_identifier(id, BOTTOM_IDENTIFIER)
            .expect("fresh Bottom node cannot collide");
        graph.define_initialization_process(id, Preconditions::default());
        graph.advance_pending(None);

        let listener: Rc<dyn GraphListener<N>> = Rc::new(BottomListener {
            bottom: id,
            subtype: Rc::clone(subtype),
        });
        graph.add_listener(listener, true);
        id
    }
}

struct BottomListener<N> {
    bottom: TypeId,
    subtype: Rc<SubTypeService<N>>,
}

impl<N: 'static + Clone> GraphListener<N> for BottomListener<N> {
    fn on_added_type(&self, graph: &TypeGraph<N>, id: TypeId) {
        if id != self.bottom {
            let _ = self.subtype.mark_as_subtype_unchecked(graph, self.bottom, id);
        }
    }
}
