// src/domain/filters.rs

use std::fmt;

/// Yes/no search filter as the site spells it in query strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Yes,
    No,
}

impl Flag {
    pub const ALL: [Flag; 2] = [Flag::Yes, Flag::No];

    pub fn as_str(self) -> &'static str {
        match self {
            Flag::Yes => "yes",
            Flag::No => "no",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HomeType {
    /// Newly built ("novostroyki").
    New,
    /// Secondary market ("vtorichnyy-rynok").
    Resale,
}

impl HomeType {
    pub const ALL: [HomeType; 2] = [HomeType::New, HomeType::Resale];

    /// URL path segment, also used in batch names.
    pub fn slug(self) -> &'static str {
        match self {
            HomeType::New => "novostroyki",
            HomeType::Resale => "vtorichnyy-rynok",
        }
    }
}

/// Tashkent districts with the site's numeric ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum District {
    Olmazor,
    Bektemir,
    Mirobod,
    MirzoUlugbek,
    Sergeli,
    Uchtepa,
    Chilonzor,
    Shayhontohur,
    Yunusobod,
    Yakkasaroy,
    Yashnobod,
}

impl District {
    pub const ALL: [District; 11] = [
        District::Olmazor,
        District::Bektemir,
        District::Mirobod,
        District::MirzoUlugbek,
        District::Sergeli,
        District::Uchtepa,
        District::Chilonzor,
        District::Shayhontohur,
        District::Yunusobod,
        District::Yakkasaroy,
        District::Yashnobod,
    ];

    pub fn code(self) -> u32 {
        match self {
            District::Olmazor => 20,
            District::Bektemir => 18,
            District::Mirobod => 13,
            District::MirzoUlugbek => 12,
            District::Sergeli => 19,
            District::Uchtepa => 21,
            District::Chilonzor => 23,
            District::Shayhontohur => 24,
            District::Yunusobod => 25,
            District::Yakkasaroy => 26,
            District::Yashnobod => 22,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            District::Olmazor => "Olmazor",
            District::Bektemir => "Bektemir",
            District::Mirobod => "Mirobod",
            District::MirzoUlugbek => "Mirzo-Ulugbek",
            District::Sergeli => "Sergeli",
            District::Uchtepa => "Uchtepa",
            District::Chilonzor => "Chilonzor",
            District::Shayhontohur => "Shayhontohur",
            District::Yunusobod => "Yunusobod",
            District::Yakkasaroy => "Yakkasaroy",
            District::Yashnobod => "Yashnobod",
        }
    }
}

/// One search section: a fixed combination of the four filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionFilter {
    pub commission: Flag,
    pub furnished: Flag,
    pub home_type: HomeType,
    pub district: District,
}

impl SectionFilter {
    /// The full cross-product, commission outermost and district innermost.
    pub fn all() -> Vec<SectionFilter> {
        let mut out = Vec::with_capacity(
            Flag::ALL.len() * Flag::ALL.len() * HomeType::ALL.len() * District::ALL.len(),
        );

        for commission in Flag::ALL {
            for furnished in Flag::ALL {
                for home_type in HomeType::ALL {
                    for district in District::ALL {
                        out.push(SectionFilter {
                            commission,
                            furnished,
                            home_type,
                            district,
                        });
                    }
                }
            }
        }

        out
    }
}

impl fmt::Display for SectionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "commission={}, furnished={}, home_type={} for {}",
            self.commission.as_str(),
            self.furnished.as_str(),
            self.home_type.slug(),
            self.district.name()
        )
    }
}
