use alloy_sol_types::sol;

sol! {
    interface ILiquidityGauge {
        function withdraw(uint256 _value) external;
        function balanceOf(address account) external view returns (uint256);
    }

    interface IVault {
        struct BatchSwapStep {
            bytes32 poolId;
            uint256 assetInIndex;
            uint256 assetOutIndex;
            uint256 amount;
            bytes userData;
        }

        struct FundManagement {
            address sender;
            bool fromInternalBalance;
            address recipient;
            bool toInternalBalance;
        }

        // `kind` is the SwapKind enum, ABI-encoded as uint8
        function batchSwap(
            uint8 kind,
            BatchSwapStep[] swaps,
            address[] assets,
            FundManagement funds,
            int256[] limits,
            uint256 deadline
        ) external payable returns (int256[] memory);
    }
}

/// Vault `SwapKind`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SwapKind {
    GivenIn = 0,
    GivenOut = 1,
}

impl SwapKind {
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(SwapKind::GivenIn),
            1 => Some(SwapKind::GivenOut),
            _ => None,
        }
    }
}

/// Indexes into the `assets` array of every exit batch swap
pub const BPT_INDEX: usize = 0;
pub const LINEAR_BPT_INDEX: usize = 1;
pub const ASSET_INDEX: usize = 2;
