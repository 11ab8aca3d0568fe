//! The form shared by the add and edit category views.

use maud::{Markup, html};

use crate::{
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, submit_button,
    },
    model::TransactionKind,
};

/// How the form is sent to the server.
#[derive(Debug, Clone, Copy)]
pub(super) enum FormAction<'a> {
    Create(&'a str),
    Update(&'a str),
}

pub(super) struct CategoryFormView<'a> {
    pub action: FormAction<'a>,
    pub name: &'a str,
    pub kind: TransactionKind,
    pub error_message: Option<&'a str>,
}

impl CategoryFormView<'_> {
    pub fn into_html(self) -> Markup {
        let (hx_post, hx_put, submit_text) = match self.action {
            FormAction::Create(endpoint) => (Some(endpoint), None, "Add category"),
            FormAction::Update(endpoint) => (None, Some(endpoint), "Update category"),
        };

        html! {
            form
                hx-post=[hx_post]
                hx-put=[hx_put]
                hx-swap="outerHTML"
                hx-target-error="#alert-container"
                hx-indicator="#indicator"
                hx-disabled-elt="#indicator"
                class="w-full space-y-4"
            {
                @if let Some(error_message) = self.error_message {
                    p class="text-red-500 text-base" { (error_message) }
                }

                div
                {
                    label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                    input
                        id="name"
                        type="text"
                        name="name"
                        placeholder="e.g., Groceries"
                        value=(self.name)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                fieldset
                {
                    legend class=(FORM_LABEL_STYLE) { "Type" }

                    div class=(FORM_RADIO_GROUP_STYLE)
                    {
                        @for kind in TransactionKind::ALL {
                            @let id = format!("kind-{}", kind.slug());

                            div class="flex-1"
                            {
                                input
                                    id=(id)
                                    type="radio"
                                    name="kind"
                                    value=(kind.api_code())
                                    checked[kind == self.kind]
                                    class=(FORM_RADIO_INPUT_STYLE);

                                label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (kind.fallback_label()) }
                            }
                        }
                    }
                }

                (submit_button(submit_text))
            }
        }
    }
}
