//! Namespace-aware element tree for SOAP replies.
//!
//! Replies are small, so the whole body is parsed into owned [`Element`]s
//! and queried by `(namespace, local name)` pairs. Prefixes never matter:
//! `<tt:Uri>` and `<Uri xmlns="http://www.onvif.org/ver10/schema">` match
//! the same [`QName`].

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

use crate::error::XmlError;

/// A namespace-qualified element name used for lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QName<'a> {
    pub namespace: &'a str,
    pub local: &'a str,
}

impl<'a> QName<'a> {
    pub const fn new(namespace: &'a str, local: &'a str) -> Self {
        Self { namespace, local }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    namespace: Option<String>,
    local_name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn from_start(namespace: Option<String>, start: &BytesStart) -> Result<Self, XmlError> {
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }

        Ok(Element {
            namespace,
            local_name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            attributes,
            text: String::new(),
            children: Vec::new(),
        })
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Character data before the first child element, whitespace kept.
    /// Text following a child is not part of it.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Looks up an attribute by its local name.
    pub fn attribute(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == local)
            .map(|(_, value)| value.as_str())
    }

    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter()
    }

    pub fn is(&self, name: QName<'_>) -> bool {
        self.local_name == name.local && self.namespace.as_deref() == Some(name.namespace)
    }

    /// All elements below this one in document order, excluding itself.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    /// First descendant with the given name.
    pub fn find(&self, name: QName<'_>) -> Option<&Element> {
        self.descendants().find(|e| e.is(name))
    }

    /// Every descendant with the given name, in document order.
    pub fn find_all<'a>(&'a self, name: QName<'a>) -> impl Iterator<Item = &'a Element> + 'a {
        self.descendants().filter(move |e| e.is(name))
    }

    /// First direct child with the given name.
    pub fn child(&self, name: QName<'_>) -> Option<&Element> {
        self.children.iter().find(|e| e.is(name))
    }

    /// Resolves `head/rest/...`: `head` anywhere below this element, every
    /// following step as a direct child of the previous one.
    pub fn find_path(&self, path: &[QName<'_>]) -> Option<&Element> {
        let (head, rest) = path.split_first()?;
        self.descendants()
            .filter(|e| e.is(*head))
            .find_map(|e| e.child_path(rest))
    }

    fn child_path(&self, path: &[QName<'_>]) -> Option<&Element> {
        match path.split_first() {
            None => Some(self),
            Some((head, rest)) => self
                .children
                .iter()
                .filter(|e| e.is(*head))
                .find_map(|e| e.child_path(rest)),
        }
    }

    /// Text of the first descendant with the given name.
    pub fn find_text(&self, name: QName<'_>) -> Option<&str> {
        self.find(name).map(Element::text)
    }
}

pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, Element>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<&'a Element> {
        while let Some(siblings) = self.stack.last_mut() {
            match siblings.next() {
                Some(element) => {
                    self.stack.push(element.children.iter());
                    return Some(element);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

/// A parsed, well-formed XML document.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    root: Element,
}

impl XmlDocument {
    pub fn parse(xml: &str) -> Result<Self, XmlError> {
        let mut reader = NsReader::from_str(xml);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let (resolved, event) = reader.read_resolved_event()?;
            let namespace = match resolved {
                ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.0).into_owned()),
                ResolveResult::Unbound => None,
                ResolveResult::Unknown(prefix) => {
                    return Err(XmlError::UnboundPrefix(
                        String::from_utf8_lossy(&prefix).into_owned(),
                    ))
                }
            };

            match event {
                Event::Start(e) => {
                    if stack.is_empty() && root.is_some() {
                        return Err(XmlError::MultipleRoots);
                    }
                    stack.push(Element::from_start(namespace, &e)?);
                }
                Event::Empty(e) => {
                    let element = Element::from_start(namespace, &e)?;
                    Self::attach(&mut stack, &mut root, element)?;
                }
                Event::End(e) => {
                    let element = stack.pop().ok_or_else(|| {
                        XmlError::UnmatchedEnd(String::from_utf8_lossy(e.name().as_ref()).into_owned())
                    })?;
                    Self::attach(&mut stack, &mut root, element)?;
                }
                Event::Text(e) => {
                    let text = e.unescape()?;
                    match stack.last_mut() {
                        Some(parent) if parent.children.is_empty() => parent.text.push_str(&text),
                        Some(_) => {}
                        None if text.trim().is_empty() => {}
                        None => return Err(XmlError::TextOutsideRoot),
                    }
                }
                Event::CData(e) => match stack.last_mut() {
                    Some(parent) if parent.children.is_empty() => {
                        parent.text.push_str(&String::from_utf8_lossy(&e.into_inner()))
                    }
                    Some(_) => {}
                    None => return Err(XmlError::TextOutsideRoot),
                },
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(XmlError::UnclosedElement(open.local_name.clone()));
        }

        root.map(|root| XmlDocument { root })
            .ok_or(XmlError::NoRootElement)
    }

    fn attach(
        stack: &mut [Element],
        root: &mut Option<Element>,
        element: Element,
    ) -> Result<(), XmlError> {
        match stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None if root.is_some() => return Err(XmlError::MultipleRoots),
            None => *root = Some(element),
        }
        Ok(())
    }

    pub fn root(&self) -> &Element {
        &self.root
    }
}
