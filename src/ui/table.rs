use eframe::egui::{self, ComboBox, DragValue, RichText, TextEdit, Ui};
use egui_extras::{Column, TableBuilder};

use claims_dashboard::data::model::ClaimRecord;
use claims_dashboard::data::table::PageSize;

use crate::color::HEADER_BLUE;
use crate::state::AppState;
use crate::ui::format;

const ROW_HEIGHT: f32 = 20.0;

/// Search box, paging controls and the current page of filtered records.
pub fn records_table(ui: &mut Ui, state: &mut AppState) {
    let mut term = state.criteria.search.clone();
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Search:");
        ui.add(
            TextEdit::singleline(&mut term)
                .hint_text("member, diagnosis, status, amount…")
                .desired_width(320.0),
        );
    });
    if term != state.criteria.search {
        state.set_search(term);
    }

    let page = state.table_page();

    ui.horizontal(|ui: &mut Ui| {
        let (matches, available) = state.report.table_counts(&page);
        ui.label(format!(
            "Showing {} of {} records",
            format::count(matches),
            format::count(available)
        ));
        ui.separator();

        let mut page_size = state.criteria.page_size;
        ComboBox::from_id_salt("page_size")
            .selected_text(format!("{} rows", page_size.rows()))
            .show_ui(ui, |ui: &mut Ui| {
                for size in PageSize::ALL {
                    ui.selectable_value(&mut page_size, size, format!("{} rows", size.rows()));
                }
            });
        if page_size != state.criteria.page_size {
            state.set_page_size(page_size);
        }

        let mut page_number = state.criteria.page_number;
        ui.label("Page");
        ui.add(DragValue::new(&mut page_number).range(1..=page.max_page));
        ui.label(format!("of {}", page.max_page));
        if page_number != state.criteria.page_number {
            state.set_page(page_number);
        }
    });

    if page.rows.is_empty() {
        ui.label(RichText::new("No records match the current filters.").italics());
        return;
    }

    ui.push_id("records_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(false)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(Column::auto().at_least(70.0), ClaimRecord::COLUMNS.len())
            .header(ROW_HEIGHT + 4.0, |mut header| {
                for name in ClaimRecord::COLUMNS {
                    header.col(|ui| {
                        ui.label(RichText::new(name).strong().color(HEADER_BLUE));
                    });
                }
            })
            .body(|mut body| {
                for record in &page.rows {
                    body.row(ROW_HEIGHT, |mut row| {
                        for cell in display_cells(record) {
                            row.col(|ui| {
                                ui.label(cell);
                            });
                        }
                    });
                }
            });
    });
}

/// Record fields in column order, with money and ratios formatted for reading.
fn display_cells(record: &ClaimRecord) -> [String; 10] {
    [
        record.member_id.clone(),
        record.diagnosis.clone(),
        record.claimstatus.clone(),
        record.accepted_date.format("%Y-%m-%d").to_string(),
        format::currency(record.claimsubmitted),
        format::currency(record.claimpaid),
        format::ratio(record.percentagepaid),
        record.year.to_string(),
        record.month.to_string(),
        record.month_year.to_string(),
    ]
}
