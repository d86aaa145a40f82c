use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("Math error - overflow")]
    Overflow,
    #[error("Math error - underflow")]
    Underflow,
    #[error("Math error - division by zero")]
    DivisionByZero,
    #[error("BitMath error - zero input value")]
    ZeroValue,
}

impl MathError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Overflow => "OVERFLOW",
            Self::Underflow => "UNDERFLOW",
            Self::DivisionByZero => "DIVISION_BY_ZERO",
            Self::ZeroValue => "ZERO",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("State error - sqrtPrice out of bounds")]
    SqrtPriceOutOfBounds,
    #[error("State error - sqrtPrice is 0")]
    SqrtPriceIsZero,
    #[error("State error - sqrtRatio is 0")]
    SqrtRatioIsZero,
    #[error("State error - tick out of bounds")]
    TickOutOfBounds,
    #[error("State error - liquidity is 0")]
    LiquidityIsZero,
    #[error("State error - requested amount exceeds pool reserves")]
    InsufficientReserves,
    #[error("State error - tick spacing must be positive")]
    TickSpacing,
    #[error("State error - fee must be below 1000000 pips")]
    InvalidFee,
    #[error("State error - sqrtPrice is not within the current tick")]
    PriceBounds,
    #[error("State error - lower tick must be below upper tick")]
    TickOrder,
    #[error("State error - lower tick out of bounds or not aligned to tick spacing")]
    TickLower,
    #[error("State error - upper tick out of bounds or not aligned to tick spacing")]
    TickUpper,
}

impl StateError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::SqrtPriceOutOfBounds => "SQRT_RATIO",
            Self::SqrtPriceIsZero => "SQRT_PRICE_ZERO",
            Self::SqrtRatioIsZero => "SQRT_RATIO_ZERO",
            Self::TickOutOfBounds => "TICK",
            Self::LiquidityIsZero => "LIQUIDITY_ZERO",
            Self::InsufficientReserves => "INSUFFICIENT_RESERVES",
            Self::TickSpacing => "TICK_SPACING",
            Self::InvalidFee => "FEE",
            Self::PriceBounds => "PRICE_BOUNDS",
            Self::TickOrder => "TICK_ORDER",
            Self::TickLower => "TICK_LOWER",
            Self::TickUpper => "TICK_UPPER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TickListError {
    #[error("TickList error - list is empty")]
    Length,
    #[error("TickList error - tick {0} is not a multiple of the tick spacing")]
    TickSpacing(i32),
    #[error("TickList error - tick {0} is outside [MIN_TICK, MAX_TICK]")]
    TickOutOfBounds(i32),
    #[error("TickList error - tick spacing must be positive")]
    TickSpacingNonzero,
    #[error("TickList error - liquidityNet does not sum to zero")]
    ZeroNet,
    #[error("TickList error - tick {0} appears more than once")]
    Duplicate(i32),
    #[error("TickList error - tick {0} has zero liquidityGross")]
    LiquidityGross(i32),
    #[error("TickList error - tick {0} is not contained in the list")]
    NotContained(i32),
    #[error("TickList error - tick is below the smallest initialized tick")]
    BelowSmallest,
    #[error("TickList error - tick is at or above the largest initialized tick")]
    AtOrAboveLargest,
}

impl TickListError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Length => "LENGTH",
            Self::TickOutOfBounds(_) => "TICK",
            Self::TickSpacing(_) | Self::TickSpacingNonzero => "TICK_SPACING",
            Self::ZeroNet => "ZERO_NET",
            Self::Duplicate(_) => "DUPLICATE",
            Self::LiquidityGross(_) => "LIQUIDITY_GROSS",
            Self::NotContained(_) => "NOT_CONTAINED",
            Self::BelowSmallest => "BELOW_SMALLEST",
            Self::AtOrAboveLargest => "AT_OR_ABOVE_LARGEST",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error("Swap error - amount specified is 0")]
    AmountSpecifiedIsZero,
    #[error("Swap error - sqrtPrice limit must be above MIN_SQRT_RATIO")]
    RatioMin,
    #[error("Swap error - sqrtPrice limit must be below MAX_SQRT_RATIO")]
    RatioMax,
    #[error("Swap error - sqrtPrice limit is on the wrong side of the current price")]
    RatioCurrent,
    #[error("Swap error - not enough liquidity to fill the requested amount")]
    InsufficientLiquidity,
    #[error("Swap error - slippage tolerance must not be negative")]
    SlippageTolerance,
}

impl SwapError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::AmountSpecifiedIsZero => "AMOUNT",
            Self::RatioMin => "RATIO_MIN",
            Self::RatioMax => "RATIO_MAX",
            Self::RatioCurrent => "RATIO_CURRENT",
            Self::InsufficientLiquidity => "INSUFFICIENT_LIQUIDITY",
            Self::SlippageTolerance => "SLIPPAGE_TOLERANCE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Config error - unrecognized rounding mode `{0}`")]
    UnknownRounding(String),
}

impl ConfigError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnknownRounding(_) => "ROUNDING",
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("No tick data provider was given")]
    NoTickDataProvider,
    #[error("Tick data fetch failed")]
    Fetch(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ProviderError {
    pub fn fetch<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Fetch(Box::new(err))
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoTickDataProvider => "NO_TICK_DATA_PROVIDER",
            Self::Fetch(_) => "FETCH",
        }
    }
}

#[cfg(feature = "onchain")]
#[derive(Debug, Error)]
pub enum OnchainError {
    #[error("Onchain error - failed to get slot0: {0}")]
    FailedToGetSlot0(String),
    #[error("Onchain error - failed to get liquidity: {0}")]
    FailedToGetLiquidity(String),
    #[error("Onchain error - failed to get tick spacing: {0}")]
    FailedToGetTickSpacing(String),
    #[error("Onchain error - failed to get fee: {0}")]
    FailedToGetFee(String),
    #[error("Onchain error - failed to get tokens: {0}")]
    FailedToGetTokens(String),
    #[error("Onchain error - multicall failed: {0}")]
    FailedToCallMulticall(String),
    #[error("Onchain error - failed to decode bitmap word: {0}")]
    FailedToDecodeBitmap(String),
    #[error("Onchain error - failed to decode tick: {0}")]
    FailedToDecodeTick(String),
    #[error("Onchain error - tick {0} does not fit in int24")]
    InvalidTick(i32),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    MathError(#[from] MathError),

    #[error(transparent)]
    StateError(#[from] StateError),

    #[error(transparent)]
    TickListError(#[from] TickListError),

    #[error(transparent)]
    SwapError(#[from] SwapError),

    #[error(transparent)]
    ConfigError(#[from] ConfigError),

    #[error(transparent)]
    ProviderError(#[from] ProviderError),
}

impl Error {
    /// Stable tag identifying which precondition failed.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MathError(e) => e.code(),
            Self::StateError(e) => e.code(),
            Self::TickListError(e) => e.code(),
            Self::SwapError(e) => e.code(),
            Self::ConfigError(e) => e.code(),
            Self::ProviderError(e) => e.code(),
        }
    }
}
