use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[derive(Clone, Debug, PartialEq)]
struct MaterialLink {
    name: String,
    file_name: String,
    href: String,
}

#[component]
pub fn MaterialsView(subject: String) -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();

    let resource = use_resource({
        let subject = subject.clone();
        move || {
            let catalog = catalog.clone();
            let subject = subject.clone();
            async move {
                let materials = catalog
                    .materials(&subject)
                    .await
                    .map_err(|err| ViewError::from_api(&err))?;
                Ok(materials
                    .iter()
                    .map(|material| MaterialLink {
                        name: material.name.clone(),
                        file_name: material.file_name().to_string(),
                        href: catalog.download_url(material),
                    })
                    .collect::<Vec<_>>())
            }
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "{subject} Study Materials" }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading materials..." }
                },
                ViewState::Ready(links) => rsx! {
                    if links.is_empty() {
                        p { "No study materials have been uploaded yet." }
                    } else {
                        ul { class: "materials",
                            for link in links {
                                li { key: "{link.href}",
                                    span { class: "material-name", "{link.name}" }
                                    a { class: "btn", href: "{link.href}", download: "{link.file_name}", "Download" }
                                }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
            }
        }
    }
}
