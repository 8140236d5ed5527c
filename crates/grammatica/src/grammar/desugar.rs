//! Lowering of declared productions.
//!
//! Groups and elements with bounds other than exactly once are moved into
//! synthetic productions, so every element refers either to a token or a
//! production once, or to a synthetic production with arbitrary bounds.
//! Synthetic ids are allocated after the largest declared id and their
//! names are `{Origin}#{n}`.

use std::sync::Arc;

use grammatica_core::ProductionId;
use indexmap::IndexMap;

use super::builder::{DeclaredElement, DeclaredProduction, Item};
use super::production::{Alternative, Element, Occurs, Production, Symbol};

pub(crate) fn lower(declared: &[DeclaredProduction]) -> IndexMap<ProductionId, Production> {
    let next_id = declared
        .iter()
        .map(|p| p.id)
        .max()
        .map_or(ProductionId(0), ProductionId::next);

    let mut lowering = Lowering {
        next_id,
        synthetic: Vec::new(),
    };

    let mut productions = IndexMap::new();
    for production in declared {
        let mut scope = Scope {
            origin: production.id,
            origin_name: &production.name,
            counter: 0,
        };
        let alternatives = lowering.alternatives(&mut scope, &production.alternatives);
        productions.insert(
            production.id,
            Production::declared(production.id, Arc::clone(&production.name), alternatives),
        );
    }
    for production in lowering.synthetic {
        productions.insert(production.id(), production);
    }
    productions
}

struct Lowering {
    next_id: ProductionId,
    synthetic: Vec<Production>,
}

struct Scope<'a> {
    origin: ProductionId,
    origin_name: &'a str,
    counter: u32,
}

impl Lowering {
    fn alternatives(
        &mut self,
        scope: &mut Scope<'_>,
        declared: &[Vec<DeclaredElement>],
    ) -> Vec<Alternative> {
        declared
            .iter()
            .map(|elements| {
                let lowered = elements.iter().map(|e| self.element(scope, e)).collect();
                Alternative::new(lowered)
            })
            .collect()
    }

    fn element(&mut self, scope: &mut Scope<'_>, declared: &DeclaredElement) -> Element {
        let symbol = match &declared.item {
            Item::Token(id) => Symbol::Token(*id),
            Item::Production(id) => Symbol::Production(*id),
            Item::Group(alternatives) => {
                let alternatives = self.alternatives(scope, alternatives);
                let id = self.synthesize(scope, alternatives);
                return Element::new(Symbol::Production(id), declared.occurs);
            }
        };

        if declared.occurs.is_once() {
            return Element::new(symbol, Occurs::ONCE);
        }

        let body = Alternative::new(vec![Element::new(symbol, Occurs::ONCE)]);
        let id = self.synthesize(scope, vec![body]);
        Element::new(Symbol::Production(id), declared.occurs)
    }

    fn synthesize(&mut self, scope: &mut Scope<'_>, alternatives: Vec<Alternative>) -> ProductionId {
        let id = self.next_id;
        self.next_id = id.next();
        scope.counter += 1;

        let name: Arc<str> = format!("{}#{}", scope.origin_name, scope.counter).into();
        self.synthetic
            .push(Production::synthetic(id, name, scope.origin, alternatives));
        id
    }
}
