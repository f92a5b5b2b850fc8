//! Field mapping tables for the two extraction schema generations
//!
//! Each canonical field lists its current-generation path first, followed by the
//! legacy aliases tried in order. Supporting another generation means adding
//! paths here; the normalizer iterates the tables generically.

use tender_core::{CanonicalTenderMetadata, Lot, PricedItem};

/// Key path into a raw JSON object
pub type FieldPath = &'static [&'static str];

/// Source paths for one canonical field
#[derive(Debug, Clone, Copy)]
pub struct FieldMapping<F> {
    pub field: F,
    pub current: FieldPath,
    pub legacy: &'static [FieldPath],
}

impl<F: Copy> FieldMapping<F> {
    /// Source paths in priority order
    pub fn sources(&self) -> impl Iterator<Item = FieldPath> + '_ {
        std::iter::once(self.current).chain(self.legacy.iter().copied())
    }
}

/// Text leaves of [`CanonicalTenderMetadata`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    Reference,
    ProcedureType,
    IssuingInstitution,
    ExecutionLocation,
    DeadlineDate,
    DeadlineTime,
    BidOpeningLocation,
    Subject,
    EstimateAmount,
    EstimateCurrency,
}

impl MetadataField {
    /// The slot this field occupies in a metadata record
    pub fn slot(self, metadata: &mut CanonicalTenderMetadata) -> &mut Option<String> {
        match self {
            MetadataField::Reference => &mut metadata.reference,
            MetadataField::ProcedureType => &mut metadata.procedure_type,
            MetadataField::IssuingInstitution => &mut metadata.issuing_institution,
            MetadataField::ExecutionLocation => &mut metadata.execution_location,
            MetadataField::DeadlineDate => &mut metadata.submission_deadline.date,
            MetadataField::DeadlineTime => &mut metadata.submission_deadline.time,
            MetadataField::BidOpeningLocation => &mut metadata.bid_opening_location,
            MetadataField::Subject => &mut metadata.subject,
            MetadataField::EstimateAmount => &mut metadata.total_estimate.amount,
            MetadataField::EstimateCurrency => &mut metadata.total_estimate.currency,
        }
    }
}

/// Text leaves of [`Lot`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LotField {
    LotNumber,
    Subject,
    Estimate,
    ProvisionalGuarantee,
}

impl LotField {
    pub fn slot(self, lot: &mut Lot) -> &mut Option<String> {
        match self {
            LotField::LotNumber => &mut lot.lot_number,
            LotField::Subject => &mut lot.subject,
            LotField::Estimate => &mut lot.estimate,
            LotField::ProvisionalGuarantee => &mut lot.provisional_guarantee,
        }
    }
}

/// Text leaves of [`PricedItem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    PriceNumber,
    Designation,
    Unit,
    Quantity,
}

impl ItemField {
    pub fn slot(self, item: &mut PricedItem) -> &mut Option<String> {
        match self {
            ItemField::PriceNumber => &mut item.price_number,
            ItemField::Designation => &mut item.designation,
            ItemField::Unit => &mut item.unit,
            ItemField::Quantity => &mut item.quantity,
        }
    }
}

pub const METADATA_FIELDS: &[FieldMapping<MetadataField>] = &[
    FieldMapping {
        field: MetadataField::Reference,
        current: &["reference_marche"],
        legacy: &[&["reference_tender"], &["reference"]],
    },
    FieldMapping {
        field: MetadataField::ProcedureType,
        current: &["type_procedure"],
        legacy: &[&["procedure"], &["procedure_type"]],
    },
    FieldMapping {
        field: MetadataField::IssuingInstitution,
        current: &["organisme_acheteur"],
        legacy: &[
            &["organisme_acheteur", "nom"],
            &["issuing_institution"],
            &["institution"],
        ],
    },
    FieldMapping {
        field: MetadataField::ExecutionLocation,
        current: &["lieu_execution"],
        legacy: &[&["execution_location"]],
    },
    FieldMapping {
        field: MetadataField::DeadlineDate,
        current: &["date_limite_remise_plis", "date"],
        legacy: &[&["submission_deadline", "date"], &["deadline", "date"]],
    },
    FieldMapping {
        field: MetadataField::DeadlineTime,
        current: &["date_limite_remise_plis", "heure"],
        legacy: &[&["submission_deadline", "time"], &["deadline", "time"]],
    },
    FieldMapping {
        field: MetadataField::BidOpeningLocation,
        current: &["lieu_ouverture_plis"],
        legacy: &[&["folder_opening_location"], &["bid_opening_location"]],
    },
    FieldMapping {
        field: MetadataField::Subject,
        current: &["objet_marche"],
        legacy: &[&["subject"], &["tender_subject"]],
    },
    FieldMapping {
        field: MetadataField::EstimateAmount,
        current: &["estimation_totale", "montant"],
        legacy: &[
            &["estimation_totale"],
            &["total_estimated_value"],
            &["total_estimate", "amount"],
        ],
    },
    FieldMapping {
        field: MetadataField::EstimateCurrency,
        current: &["estimation_totale", "devise"],
        legacy: &[
            &["total_estimated_value", "currency"],
            &["total_estimate", "currency"],
        ],
    },
];

/// Location of the Phase-1 lot list in both generations
pub const LOTS_PATH: FieldPath = &["lots"];

pub const LOT_FIELDS: &[FieldMapping<LotField>] = &[
    FieldMapping {
        field: LotField::LotNumber,
        current: &["numero_lot"],
        legacy: &[&["lot_number"], &["lot_numero"]],
    },
    FieldMapping {
        field: LotField::Subject,
        current: &["objet_lot"],
        legacy: &[&["lot_subject"], &["subject"]],
    },
    FieldMapping {
        field: LotField::Estimate,
        current: &["estimation_lot"],
        legacy: &[&["lot_estimated_value"], &["estimate"]],
    },
    FieldMapping {
        field: LotField::ProvisionalGuarantee,
        current: &["caution_provisoire"],
        legacy: &[
            &["caution_provisoire", "montant"],
            &["provisional_guarantee"],
        ],
    },
];

/// Location of the Phase-2 lot groups
pub const LOT_GROUPS_PATH: FieldPath = &["lots_articles"];

/// Lot key of a Phase-2 group, in priority order
pub const GROUP_LOT_NUMBER_PATHS: &[FieldPath] =
    &[&["numero_lot"], &["lot_numero"], &["lot_number"]];

/// Item list of a Phase-2 group, in priority order
pub const GROUP_ITEMS_PATHS: &[FieldPath] = &[&["articles"], &["items"]];

pub const ITEM_FIELDS: &[FieldMapping<ItemField>] = &[
    FieldMapping {
        field: ItemField::PriceNumber,
        current: &["numero_prix"],
        legacy: &[&["price_number"]],
    },
    FieldMapping {
        field: ItemField::Designation,
        current: &["designation"],
        legacy: &[&["description"]],
    },
    FieldMapping {
        field: ItemField::Unit,
        current: &["unite"],
        legacy: &[&["unit"]],
    },
    FieldMapping {
        field: ItemField::Quantity,
        current: &["quantite"],
        legacy: &[&["quantity"]],
    },
];
