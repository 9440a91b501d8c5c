//! Payment method catalog XML parser.
//!
//! The document is a tree of `country` > `payment_group` > `payment_type`,
//! each carrying `title` elements keyed by a `language` attribute:
//!
//! ```xml
//! <payment_types>
//!   <country code="LT">
//!     <title language="en">Lithuania</title>
//!     <payment_group key="e-banking">
//!       <title language="en">E-banking</title>
//!       <payment_type key="hanza" min="10" max="1000000" currency="EUR" is_iban="1">
//!         <title language="en">SEB bank</title>
//!         <logo_url language="en">https://.../seb_en.png</logo_url>
//!       </payment_type>
//!     </payment_group>
//!   </country>
//! </payment_types>
//! ```

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::domain::catalog::{
    LocalizedText, PaymentMethod, PaymentMethodCountry, PaymentMethodGroup, PaymentMethodList,
    DEFAULT_LANGUAGE,
};

const ROOT_ELEMENTS: [&str; 2] = ["payment_types", "webtopay"];

/// Parses a catalog document.
///
/// An unrecognised root element yields an empty list.
///
/// # Errors
///
/// Returns the reader error for malformed XML.
pub fn parse_payment_methods_xml(
    xml: &str,
    project_id: u64,
    currency: &str,
) -> Result<PaymentMethodList, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut builder = CatalogBuilder::new(project_id, currency);
    let mut root_seen = false;

    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                if !root_seen {
                    root_seen = true;
                    if !is_root(&element) {
                        return Ok(builder.finish());
                    }
                    continue;
                }
                builder.open(&element)?;
            }
            Event::Empty(element) => {
                if !root_seen {
                    return Ok(builder.finish());
                }
                builder.open(&element)?;
                builder.close(element.name().as_ref());
            }
            Event::Text(text) => builder.text(&text.unescape()?),
            Event::CData(data) => builder.text(&String::from_utf8_lossy(&data.into_inner())),
            Event::End(element) => builder.close(element.name().as_ref()),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(builder.finish())
}

fn is_root(element: &BytesStart<'_>) -> bool {
    let name = element.name();
    ROOT_ELEMENTS.iter().any(|root| name.as_ref() == root.as_bytes())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextKind {
    Title,
    LogoUrl,
}

struct PendingText {
    kind: TextKind,
    language: String,
    text: String,
}

/// Accumulates entities as the reader walks the tree.
///
/// Open entities are tracked by flags; `title` and `logo_url` attach to the
/// innermost one.
struct CatalogBuilder {
    list: PaymentMethodList,
    in_country: bool,
    in_group: bool,
    in_method: bool,
    pending: Option<PendingText>,
}

impl CatalogBuilder {
    fn new(project_id: u64, currency: &str) -> Self {
        Self {
            list: PaymentMethodList::empty(project_id, currency),
            in_country: false,
            in_group: false,
            in_method: false,
            pending: None,
        }
    }

    fn open(&mut self, element: &BytesStart<'_>) -> Result<(), quick_xml::Error> {
        match element.name().as_ref() {
            b"country" if !self.in_country => {
                self.list.countries.push(PaymentMethodCountry {
                    code: attribute(element, "code")?.unwrap_or_default(),
                    ..Default::default()
                });
                self.in_country = true;
            }
            b"payment_group" if self.in_country && !self.in_group => {
                let group = PaymentMethodGroup {
                    key: attribute(element, "key")?.unwrap_or_default(),
                    ..Default::default()
                };
                if let Some(country) = self.list.countries.last_mut() {
                    country.groups.push(group);
                }
                self.in_group = true;
            }
            b"payment_type" if self.in_group && !self.in_method => {
                let method = parse_method(element)?;
                if let Some(group) = self.current_group() {
                    group.methods.push(method);
                }
                self.in_method = true;
            }
            b"title" => self.start_text(element, TextKind::Title)?,
            b"logo_url" => self.start_text(element, TextKind::LogoUrl)?,
            _ => {}
        }
        Ok(())
    }

    fn start_text(&mut self, element: &BytesStart<'_>, kind: TextKind) -> Result<(), quick_xml::Error> {
        let language = attribute(element, "language")?
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        self.pending = Some(PendingText {
            kind,
            language,
            text: String::new(),
        });
        Ok(())
    }

    fn text(&mut self, text: &str) {
        if let Some(pending) = self.pending.as_mut() {
            pending.text.push_str(text);
        }
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"title" | b"logo_url" => self.finish_text(),
            b"payment_type" => self.in_method = false,
            b"payment_group" => self.in_group = false,
            b"country" => self.in_country = false,
            _ => {}
        }
    }

    fn finish_text(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        let target = match pending.kind {
            TextKind::LogoUrl => self.current_method().map(|m| &mut m.logo_url),
            TextKind::Title => self.current_title(),
        };
        if let Some(target) = target {
            target.insert(pending.language, pending.text);
        }
    }

    fn current_title(&mut self) -> Option<&mut LocalizedText> {
        if self.in_method {
            self.current_method().map(|m| &mut m.title)
        } else if self.in_group {
            self.current_group().map(|g| &mut g.title)
        } else if self.in_country {
            self.list.countries.last_mut().map(|c| &mut c.title)
        } else {
            None
        }
    }

    fn current_group(&mut self) -> Option<&mut PaymentMethodGroup> {
        self.list
            .countries
            .last_mut()
            .and_then(|c| c.groups.last_mut())
    }

    fn current_method(&mut self) -> Option<&mut PaymentMethod> {
        if !self.in_method {
            return None;
        }
        self.current_group().and_then(|g| g.methods.last_mut())
    }

    fn finish(self) -> PaymentMethodList {
        self.list
    }
}

fn parse_method(element: &BytesStart<'_>) -> Result<PaymentMethod, quick_xml::Error> {
    Ok(PaymentMethod {
        key: attribute(element, "key")?.unwrap_or_default(),
        min_amount: attribute(element, "min")?.and_then(|v| v.trim().parse().ok()),
        max_amount: attribute(element, "max")?.and_then(|v| v.trim().parse().ok()),
        currency: attribute(element, "currency")?.filter(|v| !v.is_empty()),
        is_iban: attribute(element, "is_iban")?.as_deref() == Some("1"),
        base_currency: attribute(element, "base_currency")?.filter(|v| !v.is_empty()),
        ..Default::default()
    })
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>, quick_xml::Error> {
    for attr in element.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == name.as_bytes() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}
