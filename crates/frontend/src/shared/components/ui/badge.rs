use leptos::prelude::*;

/// Badge component with different variants
#[component]
pub fn Badge(
    /// Badge variant: "primary", "success", "warning", "error", "neutral" (default)
    #[prop(optional, into)]
    variant: MaybeProp<String>,
    /// Badge content
    children: Children,
    /// Additional CSS classes
    #[prop(optional, into)]
    class: MaybeProp<String>,
) -> impl IntoView {
    let variant_class = move || variant_class(variant.get().as_deref().unwrap_or("neutral"));
    let additional_class = move || class.get().unwrap_or_default();

    view! {
        <span class=move || format!("badge {} {}", variant_class(), additional_class())>
            {children()}
        </span>
    }
}

fn variant_class(variant: &str) -> &'static str {
    match variant {
        "primary" => "badge--primary",
        "success" => "badge--success",
        "warning" => "badge--warning",
        "error" => "badge--error",
        _ => "badge--neutral",
    }
}

/// Label and badge variant for a credential's state flags
pub fn credential_status(revoked: bool, inactive: bool) -> (&'static str, &'static str) {
    if revoked {
        ("Revoked", "error")
    } else if inactive {
        ("Inactive", "warning")
    } else {
        ("Active", "success")
    }
}

/// Status badge of a credential: revoked, inactive or active
#[component]
pub fn CredentialStatusBadge(revoked: bool, inactive: bool) -> impl IntoView {
    let (label, variant) = credential_status(revoked, inactive);
    view! {
        <span class=format!("badge badge--status {}", variant_class(variant))>
            {label}
        </span>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revoked_wins_over_inactive() {
        assert_eq!(credential_status(true, true), ("Revoked", "error"));
        assert_eq!(credential_status(false, true), ("Inactive", "warning"));
        assert_eq!(credential_status(false, false), ("Active", "success"));
    }

    #[test]
    fn test_unknown_variant_is_neutral() {
        assert_eq!(variant_class("info"), "badge--neutral");
    }
}
