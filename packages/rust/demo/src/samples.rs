//! Ordered registry of canned sample documents.

use reqfinder_shared::SampleDocument;

/// One registered sample: a match key and its per-market documents.
#[derive(Debug, Clone)]
pub struct SampleEntry {
    /// Lower-case phrase searched for in queries.
    pub key: String,
    /// Documents keyed by market, in registration order.
    pub markets: Vec<SampleDocument>,
}

impl SampleEntry {
    /// The document for `market`, if this sample has one.
    pub fn market(&self, market: &str) -> Option<&SampleDocument> {
        self.markets.iter().find(|doc| doc.market == market)
    }

    /// The first registered market's document.
    pub fn first_market(&self) -> Option<&SampleDocument> {
        self.markets.first()
    }
}

/// Ordered lookup table of samples. Registration order breaks ties.
#[derive(Debug, Clone, Default)]
pub struct SampleRegistry {
    entries: Vec<SampleEntry>,
}

impl SampleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a market document under `key`, appending after existing entries.
    ///
    /// Documents registered under an existing key extend that key's market list.
    pub fn register(
        mut self,
        key: &str,
        market: &str,
        title: &str,
        content: &str,
    ) -> Self {
        let key = key.to_lowercase();
        let doc = SampleDocument {
            product_type: key.clone(),
            market: market.to_lowercase(),
            title: title.to_string(),
            content: content.trim().to_string(),
        };

        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.markets.push(doc),
            None => self.entries.push(SampleEntry {
                key,
                markets: vec![doc],
            }),
        }
        self
    }

    /// Registered entries in order.
    pub fn entries(&self) -> &[SampleEntry] {
        &self.entries
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The built-in demo samples.
    pub fn builtin() -> Self {
        Self::new()
            .register(
                "fitness band with lithium battery",
                "eu",
                "European Union Market Access Requirements (Wearable Device with Lithium Battery)",
                FITNESS_BAND_EU,
            )
            .register(
                "fitness band with lithium battery",
                "us",
                "United States Market Access Requirements (Wearable Device with Lithium Battery)",
                FITNESS_BAND_US,
            )
    }
}

const FITNESS_BAND_EU: &str = r#"
## Mandatory Certifications
- **CE Marking** required under multiple directives:
  - Radio Equipment Directive (RED) 2014/53/EU
  - Low Voltage Directive (LVD) 2014/35/EU
  - Electromagnetic Compatibility (EMC) Directive 2014/30/EU
  - Restriction of Hazardous Substances (RoHS) Directive 2011/65/EU

## Battery Requirements
- **IEC 62133-2:2017**: Safety requirements for portable sealed secondary lithium cells
- **Battery Directive 2006/66/EC**: Requirements for registration, collection, and recycling
- **UN 38.3**: Transport testing for lithium batteries

## Health & Safety Testing
- **EN 50566:2017**: Product standard to demonstrate compliance with RF fields from devices used near the human body
- **Biocompatibility Testing**: For materials in direct skin contact (ISO 10993-5, ISO 10993-10)
- **REACH Regulation (EC 1907/2006)**: Registration, Evaluation, Authorization of Chemicals

## Declaration Process
1. Perform conformity assessment and testing with notified body
2. Prepare technical documentation including test reports
3. Issue Declaration of Conformity (DoC)
4. Affix CE marking to product

## Packaging & Labeling
- CE mark must be at least 5mm in height
- Battery disposal information
- WEEE symbol for electronic waste

❗ **Important Update**: Starting January 1, 2024, new requirements under Regulation (EU) 2023/648 will impose additional phthalate restrictions for wearable devices
"#;

const FITNESS_BAND_US: &str = r#"
## FCC Certification
- **FCC Part 15**: For wireless devices (Bluetooth, Wi-Fi)
  - Equipment authorization required
  - Subpart B for unintentional radiators
  - Subpart C for intentional radiators

## Battery Safety
- **UL 1642**: Standard for Lithium Batteries
- **UN 38.3**: Transport testing for lithium batteries
- **49 CFR 173.185**: DOT regulations for lithium battery shipping

## Consumer Safety
- **CPSC Compliance**: Consumer Product Safety Commission requirements
- **Biocompatibility Testing**: For materials in direct skin contact
- **California Proposition 65**: Warning requirements for chemicals

## FDA Requirements
- May require FDA registration if health claims are made
- If collecting vital signs, may be considered a medical device under 21 CFR 880.6310

## Import Requirements
- **CBP Filing**: Customs and Border Protection documentation
- **Country of Origin** marking required
- **Harmonized Tariff Schedule** (HTS) classification

❗ **Important Notice**: FCC has proposed new rules for IoT device security requirements, anticipated to be finalized by Q2 2024
"#;
