use swc_core::{
    common::DUMMY_SP,
    ecma::ast::*,
};

/// Index of an attribute inside an opening element's attribute list.
pub type AttrSlot = usize;

fn attr_name_is(attr: &JSXAttr, name: &str) -> bool {
    match &attr.name {
        JSXAttrName::Ident(ident) => ident.sym.as_ref() == name,
        JSXAttrName::JSXNamespacedName(_) => false,
    }
}

/// Slots of every attribute called `name`, in source order. Spread
/// attributes are never matched.
pub fn find(element: &JSXElement, name: &str) -> Vec<AttrSlot> {
    element
        .opening
        .attrs
        .iter()
        .enumerate()
        .filter_map(|(slot, attr)| match attr {
            JSXAttrOrSpread::JSXAttr(a) if attr_name_is(a, name) => Some(slot),
            _ => None,
        })
        .collect()
}

/// Replace the attribute at `slot` with one called `new_name` holding the
/// original value untouched. Returns `false` if `slot` is not an attribute.
pub fn rename(element: &mut JSXElement, slot: AttrSlot, new_name: &str) -> bool {
    let Some(JSXAttrOrSpread::JSXAttr(old)) = element.opening.attrs.get_mut(slot) else {
        return false;
    };
    let value = old.value.take();
    let renamed = JSXAttr {
        span: old.span,
        name: JSXAttrName::Ident(IdentName::new(new_name.into(), DUMMY_SP)),
        value,
    };
    element.opening.attrs[slot] = JSXAttrOrSpread::JSXAttr(renamed);
    true
}

/// Remove the attribute at `slot`, returning it.
pub fn remove(element: &mut JSXElement, slot: AttrSlot) -> Option<JSXAttr> {
    match element.opening.attrs.get(slot) {
        Some(JSXAttrOrSpread::JSXAttr(_)) => match element.opening.attrs.remove(slot) {
            JSXAttrOrSpread::JSXAttr(attr) => Some(attr),
            JSXAttrOrSpread::SpreadElement(_) => None,
        },
        _ => None,
    }
}

/// The identifier held by `name={ident}`, if that is the attribute's shape.
pub fn value_ident(element: &JSXElement, slot: AttrSlot) -> Option<&Ident> {
    let JSXAttrOrSpread::JSXAttr(attr) = element.opening.attrs.get(slot)? else {
        return None;
    };
    match attr.value.as_ref()? {
        JSXAttrValue::JSXExprContainer(JSXExprContainer {
            expr: JSXExpr::Expr(expr),
            ..
        }) => match &**expr {
            Expr::Ident(ident) => Some(ident),
            Expr::Paren(ParenExpr { expr, .. }) => match &**expr {
                Expr::Ident(ident) => Some(ident),
                _ => None,
            },
            _ => None,
        },
        _ => None,
    }
}
