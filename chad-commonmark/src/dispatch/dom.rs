//! Small helpers over the kuchikikiki DOM.
use kuchikikiki::NodeRef;

/// Whether `node` is an element whose `class` list contains `class`.
#[must_use]
pub fn has_class(node: &NodeRef, class: &str) -> bool {
  node.as_element().is_some_and(|element| {
    element
      .attributes
      .borrow()
      .get("class")
      .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
  })
}

/// Nearest self-or-ancestor element carrying any of `classes`.
#[must_use]
pub fn closest_with_class(node: &NodeRef, classes: &[&str]) -> Option<NodeRef> {
  node
    .inclusive_ancestors()
    .find(|ancestor| classes.iter().any(|class| has_class(ancestor, class)))
}

/// Value of attribute `name`, if `node` is an element that has it.
#[must_use]
pub fn attribute(node: &NodeRef, name: &str) -> Option<String> {
  node
    .as_element()?
    .attributes
    .borrow()
    .get(name)
    .map(ToString::to_string)
}

/// Add `class` to the element's class list. No-op for non-elements.
pub fn add_class(node: &NodeRef, class: &str) {
  let Some(element) = node.as_element() else {
    return;
  };
  let mut attributes = element.attributes.borrow_mut();
  let classes = attributes.get("class").unwrap_or_default().to_string();
  if classes.split_whitespace().any(|c| c == class) {
    return;
  }
  let updated = if classes.trim().is_empty() {
    class.to_string()
  } else {
    format!("{} {class}", classes.trim_end())
  };
  attributes.insert("class", updated);
}

/// Remove `class` from the element's class list.
pub fn remove_class(node: &NodeRef, class: &str) {
  let Some(element) = node.as_element() else {
    return;
  };
  let mut attributes = element.attributes.borrow_mut();
  let Some(classes) = attributes.get("class") else {
    return;
  };
  let updated = classes
    .split_whitespace()
    .filter(|c| *c != class)
    .collect::<Vec<_>>()
    .join(" ");
  attributes.insert("class", updated);
}

/// Detach and return every child of `node`.
pub fn take_children(node: &NodeRef) -> Vec<NodeRef> {
  let children: Vec<NodeRef> = node.children().collect();
  for child in &children {
    child.detach();
  }
  children
}

/// Replace the children of `node` with `children`.
pub fn replace_children(node: &NodeRef, children: Vec<NodeRef>) {
  take_children(node);
  for child in children {
    node.append(child);
  }
}

/// Serialize `node` and its descendants to HTML.
#[must_use]
pub fn outer_html(node: &NodeRef) -> String {
  let mut buf = Vec::new();
  if let Err(e) = node.serialize(&mut buf) {
    log::error!("Failed to serialize DOM node: {e}");
  }
  String::from_utf8(buf).unwrap_or_default()
}
