//! Contract interfaces read by the SDK.
//!
//! Only the functions the readers call are declared. Return values with more
//! than one output are named so alloy generates field access instead of
//! positional `_0`, `_1`.

use alloy::sol;

sol! {
    /// Subscription bookkeeping shared by component and CUI contracts.
    #[sol(rpc)]
    interface ISubscribable {
        struct Subscription {
            uint256 start;
            uint256 end;
            uint256 usage;
            uint256 totalCharged;
            uint256 fee;
        }

        function getSubscribersArray() external view returns (address[] memory);
        function subscribers(address subscriber) external view returns (bool isActive, uint256 lastSubscriptionId);
        function getLatestSubscriptionForUser(address subscriber) external view returns (Subscription memory);
        function getSubscriptionForUserByIndex(address subscriber, uint256 index) external view returns (Subscription memory);
    }

    /// A component with usage-based and monthly pricing.
    #[sol(rpc)]
    interface IComponent {
        function getData() external view returns (
            address owner,
            bool revoked,
            bool paymentUsageIsActive,
            uint256 paymentUsageFee,
            bool paymentMonthlyIsActive,
            uint256 paymentMonthlyFee,
            uint256 subscribersCount,
            uint256 subscriptionsCount
        );
        function isFree() external view returns (bool);
        function getSubscriptionsArray() external view returns (address[] memory);
    }

    /// A licensed CUI.
    #[sol(rpc)]
    interface ICui {
        function owner() external view returns (address);
        function licenseFee() external view returns (uint256);
        function latestLicenseChange() external view returns (uint256);
        function isRevoked() external view returns (bool);
        function getSubscribersArrayLength() external view returns (uint256);
    }

    /// A user identity contract.
    #[sol(rpc)]
    interface IUserIdentity {
        function getComponentsArray() external view returns (address[] memory);
        function getComponentsLength() external view returns (uint256);
        function getSubscriptionsArray() external view returns (address[] memory);
        function getSubscriptionsLength() external view returns (uint256);
    }

    /// ERC-20 token subset.
    #[sol(rpc)]
    interface IToken {
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
    }

    /// Registry of all component/CUI contracts.
    #[sol(rpc)]
    interface IComponentRepository {
        function getComponents() external view returns (address[] memory);
        function getComponentsLength() external view returns (uint256);
        function componentsData(address component) external view returns (address owner, bool exists);
    }
}
