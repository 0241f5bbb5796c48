//! Sortable table columns of every resource screen.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

use crate::controller::sort::{SortValue, Sortable};
use crate::domain::karkun::KarkunJoinRequest;
use crate::domain::khat::{Question, QuestionStatus};
use crate::domain::mehfil::Mehfil;
use crate::domain::message::Message;
use crate::domain::naat_shareef::NaatShareef;
use crate::domain::tarteeb::TarteebRequest;
use crate::domain::taxonomy::{Category, Tag};
use crate::domain::types::Prayer;
use crate::domain::zone::Zone;

fn date(value: Option<NaiveDate>) -> SortValue {
    SortValue::optional_number(value.map(|d| d.num_days_from_ce()))
}

fn timestamp(value: Option<DateTime<Utc>>) -> SortValue {
    SortValue::optional_number(value.map(|t| t.timestamp()))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ZoneColumn {
    Id,
    Title,
    Country,
    City,
    Ceo,
    CreatedAt,
}

impl Sortable for Zone {
    type Column = ZoneColumn;

    fn sort_value(&self, column: ZoneColumn) -> SortValue {
        match column {
            ZoneColumn::Id => SortValue::number(self.id.get()),
            ZoneColumn::Title => SortValue::text(&self.title_en),
            ZoneColumn::Country => SortValue::text(&self.country_en),
            ZoneColumn::City => SortValue::text(&self.city_en),
            ZoneColumn::Ceo => SortValue::optional_text(self.ceo.as_deref()),
            ZoneColumn::CreatedAt => timestamp(self.created_at),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MehfilColumn {
    Id,
    Title,
    Date,
    Time,
    Type,
    Published,
}

impl Sortable for Mehfil {
    type Column = MehfilColumn;

    fn sort_value(&self, column: MehfilColumn) -> SortValue {
        match column {
            MehfilColumn::Id => SortValue::number(self.id.get()),
            MehfilColumn::Title => SortValue::text(&self.title_en),
            MehfilColumn::Date => date(self.date),
            // Prayer order, not alphabetical.
            MehfilColumn::Time => SortValue::optional_number(
                self.prayer_time()
                    .and_then(|p| Prayer::ALL.iter().position(|&x| x == p))
                    .map(|index| index as i64),
            ),
            MehfilColumn::Type => SortValue::optional_text(self.mehfil_type.as_deref()),
            MehfilColumn::Published => SortValue::Bool(self.is_published),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum NaatShareefColumn {
    Id,
    Title,
    Slug,
    Category,
    Track,
}

impl Sortable for NaatShareef {
    type Column = NaatShareefColumn;

    fn sort_value(&self, column: NaatShareefColumn) -> SortValue {
        match column {
            NaatShareefColumn::Id => SortValue::number(self.id.get()),
            NaatShareefColumn::Title => SortValue::text(&self.title_en),
            NaatShareefColumn::Slug => SortValue::text(&self.slug),
            NaatShareefColumn::Category => {
                SortValue::optional_number(self.category_id.map(|id| id.get()))
            }
            NaatShareefColumn::Track => SortValue::optional_text(self.track.as_deref()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MessageColumn {
    Id,
    Title,
    Published,
    AtTop,
    Links,
}

impl Sortable for Message {
    type Column = MessageColumn;

    fn sort_value(&self, column: MessageColumn) -> SortValue {
        match column {
            MessageColumn::Id => SortValue::number(self.id.get()),
            MessageColumn::Title => SortValue::text(&self.title_en),
            MessageColumn::Published => SortValue::Bool(self.is_published),
            MessageColumn::AtTop => SortValue::Bool(self.at_top),
            MessageColumn::Links => SortValue::Number(self.links.len() as i64),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum KarkunJoinRequestColumn {
    Id,
    Name,
    Email,
    UserType,
    Zone,
    Approved,
}

impl Sortable for KarkunJoinRequest {
    type Column = KarkunJoinRequestColumn;

    fn sort_value(&self, column: KarkunJoinRequestColumn) -> SortValue {
        match column {
            KarkunJoinRequestColumn::Id => SortValue::number(self.id.get()),
            KarkunJoinRequestColumn::Name => SortValue::text(&self.full_name()),
            KarkunJoinRequestColumn::Email => SortValue::text(&self.email),
            KarkunJoinRequestColumn::UserType => {
                SortValue::optional_text(self.user_type.as_deref())
            }
            KarkunJoinRequestColumn::Zone => {
                SortValue::optional_number(self.zone_id.map(|id| id.get()))
            }
            KarkunJoinRequestColumn::Approved => SortValue::Bool(self.is_approved),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TarteebRequestColumn {
    Id,
    Name,
    Status,
    TotalWazaif,
    CreatedAt,
}

impl Sortable for TarteebRequest {
    type Column = TarteebRequestColumn;

    fn sort_value(&self, column: TarteebRequestColumn) -> SortValue {
        match column {
            TarteebRequestColumn::Id => SortValue::number(self.id.get()),
            TarteebRequestColumn::Name => SortValue::text(&self.full_name),
            TarteebRequestColumn::Status => SortValue::text(self.state().as_str()),
            TarteebRequestColumn::TotalWazaif => {
                SortValue::Number(i64::try_from(self.wazaif.total()).unwrap_or(i64::MAX))
            }
            TarteebRequestColumn::CreatedAt => timestamp(self.created_at),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TagColumn {
    Id,
    Name,
}

impl Sortable for Tag {
    type Column = TagColumn;

    fn sort_value(&self, column: TagColumn) -> SortValue {
        match column {
            TagColumn::Id => SortValue::number(self.id.get()),
            TagColumn::Name => SortValue::text(&self.name_en),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CategoryColumn {
    Id,
    Title,
}

impl Sortable for Category {
    type Column = CategoryColumn;

    fn sort_value(&self, column: CategoryColumn) -> SortValue {
        match column {
            CategoryColumn::Id => SortValue::number(self.id.get()),
            CategoryColumn::Title => SortValue::text(&self.title_en),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum QuestionColumn {
    Id,
    Question,
    Status,
    CreatedAt,
}

impl Sortable for Question {
    type Column = QuestionColumn;

    fn sort_value(&self, column: QuestionColumn) -> SortValue {
        match column {
            QuestionColumn::Id => SortValue::number(self.id.get()),
            QuestionColumn::Question => SortValue::text(&self.question),
            QuestionColumn::Status => SortValue::Bool(self.status() == QuestionStatus::Answered),
            QuestionColumn::CreatedAt => timestamp(self.created_at),
        }
    }
}
