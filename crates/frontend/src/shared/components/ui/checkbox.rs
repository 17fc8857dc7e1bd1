use leptos::prelude::*;

/// Checkbox bound to a boolean filter
#[component]
pub fn Checkbox(
    /// Label text
    #[prop(into)]
    label: Signal<String>,
    /// Checked state
    #[prop(into)]
    checked: Signal<bool>,
    /// Change event handler
    #[prop(optional)]
    on_change: Option<Callback<bool>>,
    /// Disabled state
    #[prop(optional, into)]
    disabled: MaybeProp<bool>,
    /// Form field name; also used as the element id
    #[prop(optional, into)]
    name: MaybeProp<String>,
) -> impl IntoView {
    let field_name = move || name.get().unwrap_or_default();
    let is_disabled = move || disabled.get().unwrap_or(false);
    let wrapper_class = move || {
        if is_disabled() {
            "form__checkbox-wrapper form__checkbox-wrapper--disabled"
        } else {
            "form__checkbox-wrapper"
        }
    };

    view! {
        <div class=wrapper_class>
            <input
                id=field_name
                name=field_name
                type="checkbox"
                class="form__checkbox"
                value="true"
                prop:checked=move || checked.get()
                disabled=is_disabled
                on:change=move |ev| {
                    if let Some(handler) = on_change {
                        handler.run(event_target_checked(&ev));
                    }
                }
            />
            <label class="form__checkbox-label" for=field_name>
                {label}
            </label>
        </div>
    }
}
