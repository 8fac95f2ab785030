use crate::domain::feedback::Feedback;
use crate::domain::filter::SearchQuery;
use crate::domain::listing::{format_price, Listing, ListingStatus, Tier, MINOR_PER_AZN};
use crate::domain::pagination::PageItem;
use crate::domain::statistics::{MonthlySnapshot, StatisticsSnapshot};
use crate::templates::{
    components::{error_list, pagination_nav, search_form},
    desktop_layout,
};
use maud::{html, Markup};

/// Values shown in the create/edit form. Price is whole AZN as typed.
#[derive(Debug, Clone, Default)]
pub struct ListingFormVm {
    pub phone_number: String,
    pub price_azn: String,
    pub contact_phone: String,
    pub tier: String,
    pub description: String,
    pub is_seller: bool,
    pub is_vip: bool,
}

impl From<&Listing> for ListingFormVm {
    fn from(l: &Listing) -> Self {
        Self {
            phone_number: l.phone_number.clone(),
            price_azn: (l.price / MINOR_PER_AZN).to_string(),
            contact_phone: l.contact_phone.clone(),
            tier: l.tier.as_str().to_string(),
            description: l.description.clone(),
            is_seller: l.is_seller,
            is_vip: l.is_vip,
        }
    }
}

pub struct AdminVm<'a> {
    pub stats: StatisticsSnapshot,
    pub month: MonthlySnapshot,
    pub query: &'a SearchQuery,
    pub rows: Vec<Listing>,
    pub total: usize,
    pub page: usize,
    pub window: Vec<PageItem>,
    pub feedback: Vec<Feedback>,
    pub errors: Vec<String>,
    pub form: ListingFormVm,
    /// Id of the listing being edited, if any.
    pub editing: Option<String>,
}

fn export_href(query: &SearchQuery) -> String {
    let mut params = url::form_urlencoded::Serializer::new(String::new());
    params.append_pair("q", &query.search_term);
    params.append_pair("prefix", &query.selected_prefix);
    params.append_pair("type", &query.selected_tier);
    format!("/admin/export?{}", params.finish())
}

fn stat_tile(label: &str, value: i64) -> Markup {
    html! {
        div class="card stat" {
            div class="stat-label" { (label) }
            div class="stat-value" { (value) }
        }
    }
}

fn listing_form(vm: &AdminVm) -> Markup {
    let form = &vm.form;
    let action = match &vm.editing {
        Some(id) => format!("/admin/listings/{id}"),
        None => "/admin/listings".to_string(),
    };

    html! {
        div class="card" {
            h3 {
                @if vm.editing.is_some() { "Edit number" } @else { "Add number" }
            }
            (error_list(&vm.errors))
            form method="post" action=(action) {
                input name="phone_number" placeholder="055-123-45-67" value=(form.phone_number) required;
                input name="price" type="number" min="1" placeholder="Price (AZN)" value=(form.price_azn) required;
                input name="contact_phone" placeholder="Contact phone" value=(form.contact_phone) required;
                select name="type" {
                    @for tier in Tier::ALL {
                        option value=(tier.as_str()) selected[form.tier == tier.as_str()] { (tier.as_str()) }
                    }
                }
                input name="description" placeholder="Description" value=(form.description);
                label { input type="checkbox" name="is_seller" value="1" checked[form.is_seller]; " Seller" }
                label { input type="checkbox" name="is_vip" value="1" checked[form.is_vip]; " VIP" }
                button type="submit" { "Save" }
                @if vm.editing.is_some() {
                    " " a href="/admin" { "Cancel" }
                }
            }
        }
    }
}

pub fn admin_page(vm: &AdminVm) -> Markup {
    desktop_layout(
        "Admin Dashboard",
        true,
        html! {
            main class="container" {
                h1 { "Admin Dashboard" }

                div class="listing-grid" {
                    (stat_tile("Total visitors", vm.stats.total_visitors))
                    (stat_tile("Today", vm.stats.today_visitors))
                    (stat_tile("Sold", vm.stats.total_sold))
                    (stat_tile("Active listings", vm.stats.total_listings))
                    (stat_tile(&format!("Visitors {}", vm.month.month), vm.month.visitors))
                    (stat_tile(&format!("Page views {}", vm.month.month), vm.month.page_views))
                }

                (listing_form(vm))

                div class="card" {
                    h3 { "Numbers (" (vm.total) ")" }
                    (search_form("/admin", vm.query, true))
                    p { a href=(export_href(vm.query)) { "Export to Excel" } }

                    table {
                        thead {
                            tr {
                                th { "Number" }
                                th { "Operator" }
                                th { "Type" }
                                th { "Price" }
                                th { "Status" }
                                th { "Expires" }
                                th { "Actions" }
                            }
                        }
                        tbody {
                            @for l in &vm.rows {
                                tr {
                                    td { (l.phone_number) }
                                    td { (l.operator().name()) }
                                    td { (l.tier) }
                                    td { (format_price(l.price)) }
                                    td { (l.status) }
                                    td {
                                        @match l.expires_at {
                                            Some(ts) => { (ts.format("%Y-%m-%d")) }
                                            None => { "-" }
                                        }
                                    }
                                    td {
                                        a href=(format!("/admin?edit={}", l.id)) { "Edit" }
                                        @if l.status != ListingStatus::Sold {
                                            form method="post" action=(format!("/admin/listings/{}/sold", l.id)) style="display: inline;" {
                                                button type="submit" { "Mark sold" }
                                            }
                                        }
                                        form method="post" action=(format!("/admin/listings/{}/delete", l.id))
                                            onsubmit="return confirm('Delete this number?');" style="display: inline;" {
                                            button type="submit" { "Delete" }
                                        }
                                    }
                                }
                            }
                        }
                    }

                    (pagination_nav("/admin", vm.query, vm.page, &vm.window))
                }

                div class="card" {
                    h3 { "Feedback" }
                    @if vm.feedback.is_empty() {
                        p { "No feedback yet." }
                    }
                    @for f in &vm.feedback {
                        div class="feedback" {
                            p {
                                strong { (f.subject) }
                                " · " (f.feedback_type.label())
                                " · " (f.rating) "/5"
                            }
                            p { (f.message) }
                            p class="meta" {
                                (f.name) " <" (f.email) ">"
                                @if !f.phone.is_empty() { " · " (f.phone) }
                            }
                            form method="post" action=(format!("/admin/feedback/{}/delete", f.id)) {
                                button type="submit" { "Delete" }
                            }
                        }
                    }
                }
            }
        },
    )
}
